//! Error types for the Paygate facade.

use std::fmt;

use paygate_core::RejectReason;
use thiserror::Error;

/// The processor an outbound call was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Processor {
    Momo,
    Vnpay,
}

impl Processor {
    /// Display name, as shoppers know it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Momo => "MoMo",
            Self::Vnpay => "VNPAY",
        }
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors surfaced to callers of the [`crate::Gateway`].
///
/// No variant ever carries secret material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Processor configuration is missing or incomplete.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request was rejected before anything was sent.
    #[error("validation error: {0}")]
    Validation(RejectReason),

    /// An inbound payload could not be parsed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An inbound payload failed signature verification.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The processor did not answer usably (timeout, connection failure, non-2xx).
    #[error("{processor} unavailable: {reason}")]
    GatewayUnavailable { processor: Processor, reason: String },

    /// The processor answered and refused. Its fields pass through unchanged.
    #[error("gateway rejected the request: {}", .message.as_deref().unwrap_or("no message"))]
    GatewayRejected {
        result_code: Option<String>,
        error_code: Option<String>,
        message: Option<String>,
        local_message: Option<String>,
    },
}

impl GatewayError {
    pub(crate) fn unavailable(processor: Processor, reason: impl Into<String>) -> Self {
        Self::GatewayUnavailable {
            processor,
            reason: reason.into(),
        }
    }

    /// Message suitable for showing to a shopper, in Vietnamese.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(what) if what.starts_with("momo") => {
                "Cấu hình MoMo chưa đầy đủ".to_string()
            }
            Self::Configuration(what) if what.starts_with("vnpay") => {
                "Cấu hình VNPAY chưa đầy đủ".to_string()
            }
            Self::Configuration(_) => "Cấu hình thanh toán chưa đầy đủ".to_string(),
            Self::Validation(RejectReason::InvalidAmount(_)) => {
                "Số tiền phải lớn hơn 0".to_string()
            }
            Self::Validation(RejectReason::AmountOverflow) => "Số tiền quá lớn".to_string(),
            Self::Validation(_) => "Dữ liệu thanh toán không hợp lệ".to_string(),
            Self::MalformedInput(_) => "Request không hợp lệ".to_string(),
            Self::SignatureMismatch => "Chữ ký không hợp lệ".to_string(),
            Self::GatewayUnavailable { processor, .. } => format!(
                "Hệ thống {} đang bận, vui lòng thử lại sau (không nhận được phản hồi).",
                processor
            ),
            Self::GatewayRejected {
                message,
                local_message,
                ..
            } => local_message
                .clone()
                .or_else(|| message.clone())
                .unwrap_or_else(|| "Giao dịch bị từ chối".to_string()),
        }
    }
}

impl From<RejectReason> for GatewayError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Configuration(what) => Self::Configuration(what),
            other => Self::Validation(other),
        }
    }
}

/// Result type for Gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
