//! Transport error types.

use thiserror::Error;

/// Errors from delivering a request to a processor.
///
/// Every variant means no usable answer arrived. A processor that answered
/// with an error status is a successful transport call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("transport misconfigured: {0}")]
    Setup(String),
}

impl TransportError {
    /// Whether the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
