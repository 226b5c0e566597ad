//! Error types for Paygate Core.

use thiserror::Error;

/// Errors raised by the pure encoding and signing path.
///
/// None of these variants carry secret material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("signing secret is empty")]
    EmptySecret,

    #[error("amount must be a positive integer, got {0}")]
    InvalidAmount(i64),

    #[error("amount {0} overflows when scaled by {1}")]
    AmountOverflow(u64, u64),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
