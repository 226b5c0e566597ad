//! # Paygate VNPAY
//!
//! VNPAY payment gateway integration.
//!
//! VNPAY sorts every `vnp_*` parameter by name, percent-encodes names and
//! values, and keys the joined string with HMAC-SHA512. The signed string is
//! also the query string of the payment URL the buyer is redirected to. The
//! same rule applies in reverse to the IPN and to the browser return leg.
//!
//! ## Key Types
//!
//! - [`VnpayConfig`] - Merchant credentials, endpoint and protocol constants
//! - [`VnpayRequestBuilder`] - Validates, signs and assembles payment URLs
//! - [`VnpayVerifier`] - Verifies IPN and return-URL signatures

pub mod callback;
pub mod config;
pub mod request;

pub use callback::{VnpayAcknowledgement, VnpayVerifier, SUCCESS_CODE};
pub use config::VnpayConfig;
pub use request::{
    VnpayCreateResult, VnpayPaymentRequest, VnpayRequestBuilder, VnpaySignedRequest,
    DEFAULT_ORDER_INFO,
};
