//! Payment intents and the collaborators that mint them.
//!
//! A [`PaymentIntent`] is created once per "create payment" call. Its
//! identifiers are fresh; a retry mints a new intent rather than reusing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Amount, OrderId, RequestId};

/// Source of globally unique identifier strings.
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier. Must never repeat.
    fn next_id(&self) -> String;
}

/// Random 128-bit identifiers (UUID v4).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Wall clock used for processor timestamps.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Everything that identifies one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Validated amount in major units (unscaled).
    pub amount: Amount,
    /// Fresh merchant order reference.
    pub order_id: OrderId,
    /// Fresh per-attempt request id.
    pub request_id: RequestId,
    /// Human-readable order description.
    pub order_info: String,
    /// Display language requested from the processor.
    pub locale: String,
    /// Optional bank preselection.
    pub bank_code: Option<String>,
    /// When the intent was minted.
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// Mint an intent with two fresh identifiers and the current time.
    pub fn mint(
        amount: Amount,
        order_info: impl Into<String>,
        locale: impl Into<String>,
        bank_code: Option<String>,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            amount,
            order_id: OrderId::new(ids.next_id()),
            request_id: RequestId::new(ids.next_id()),
            order_info: order_info.into(),
            locale: locale.into(),
            bank_code: bank_code.filter(|code| !code.is_empty()),
            created_at: clock.now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_uses_fresh_identifiers() {
        let amount = Amount::new(1000).unwrap();
        let a = PaymentIntent::mint(amount, "pay", "vn", None, &UuidGenerator, &SystemClock);
        let b = PaymentIntent::mint(amount, "pay", "vn", None, &UuidGenerator, &SystemClock);

        assert_ne!(a.order_id.as_str(), a.request_id.as_str());
        assert_ne!(a.order_id, b.order_id);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_empty_bank_code_dropped() {
        let amount = Amount::new(1).unwrap();
        let intent = PaymentIntent::mint(
            amount,
            "pay",
            "vn",
            Some(String::new()),
            &UuidGenerator,
            &SystemClock,
        );
        assert_eq!(intent.bank_code, None);
    }

    #[test]
    fn test_uuid_generator_format() {
        let id = UuidGenerator.next_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
