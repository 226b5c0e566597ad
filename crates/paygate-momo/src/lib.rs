//! # Paygate MoMo
//!
//! MoMo e-wallet integration.
//!
//! MoMo signs a fixed, documented field list joined as raw `key=value`
//! pairs and keyed with HMAC-SHA256. Payments are created by POSTing a JSON
//! body; the processor answers with a `payUrl` and later confirms the outcome
//! through an IPN (Instant Payment Notification) POST.
//!
//! ## Key Types
//!
//! - [`MomoConfig`] - Partner credentials and endpoints
//! - [`MomoRequestBuilder`] - Validates, signs and assembles create requests
//! - [`MomoCreateOutcome`] - Classification of the processor's create response
//! - [`MomoIpnVerifier`] - Verifies IPN signatures and result codes

pub mod callback;
pub mod config;
pub mod request;
pub mod response;

pub use callback::{MomoIpnVerifier, IPN_FIELDS, SUCCESS_CODE};
pub use config::MomoConfig;
pub use request::{
    MomoCreateRequest, MomoPaymentRequest, MomoRequestBuilder, MomoSignedRequest, CREATE_FIELDS,
};
pub use response::{interpret_response, MomoCreateOutcome, MomoPayment};
