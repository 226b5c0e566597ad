//! Strong type definitions for Paygate.
//!
//! Identifiers and amounts are newtypes to prevent misuse at compile time.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A positive payment amount in the merchant's major currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    /// Validate a caller-supplied amount. Zero and negatives are rejected.
    pub fn new(value: i64) -> Result<Self> {
        if value <= 0 {
            return Err(CoreError::InvalidAmount(value));
        }
        Ok(Self(value as u64))
    }

    /// The unscaled value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The value multiplied by a processor's minor-unit factor.
    pub fn scaled(self, multiplier: u64) -> Result<u64> {
        self.0
            .checked_mul(multiplier)
            .ok_or(CoreError::AmountOverflow(self.0, multiplier))
    }
}

impl TryFrom<i64> for Amount {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merchant-side order reference sent to the processor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-attempt request identifier. Never reused across retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 14-digit `YYYYMMDDHHmmss` timestamp in a processor's local offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp14(String);

impl Timestamp14 {
    /// Render `at` in the given UTC offset.
    pub fn format(at: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(at.with_timezone(&offset).format("%Y%m%d%H%M%S").to_string())
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp14 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
