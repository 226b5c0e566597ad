//! # Paygate
//!
//! Signed payment requests and verified callbacks for Vietnamese payment
//! processors.
//!
//! ## Overview
//!
//! Paygate brings the processor integrations together:
//!
//! - **MoMo**: fixed-order raw canonical strings, HMAC-SHA256, JSON create calls, JSON IPN
//! - **VNPAY**: sorted percent-encoded query strings, HMAC-SHA512, redirect URLs, query-string IPN
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paygate::{Gateway, GatewayConfig, VnpayPaymentRequest};
//!
//! # fn main() -> paygate::Result<()> {
//! let config = GatewayConfig::from_file(std::path::Path::new("paygate.toml"))?;
//! let gateway = Gateway::from_config(config)?;
//!
//! let created = gateway.create_vnpay_payment(&VnpayPaymentRequest {
//!     amount: 150_000,
//!     ..Default::default()
//! })?;
//! println!("redirect the buyer to {}", created.payment_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Invariants
//!
//! - Secrets are never logged and never appear in errors
//! - A forged callback is never reported as a verified failure
//! - Identifiers are fresh for every create call

pub mod config;
pub mod error;
pub mod gateway;
pub mod inbound;

pub use config::{GatewayConfig, HttpConfig};
pub use error::{GatewayError, Processor, Result};
pub use gateway::{Gateway, IpnReply, MomoPaymentCreated};
pub use inbound::{flatten_json, parse_query};

// Re-export the building blocks
pub use paygate_core::{
    Acknowledgement, CallbackResult, Clock, IdGenerator, ParameterSet, RejectReason, SecretKey,
};
pub use paygate_momo::{MomoConfig, MomoPaymentRequest};
pub use paygate_transport::{Transport, TransportError};
pub use paygate_vnpay::{VnpayAcknowledgement, VnpayConfig, VnpayCreateResult, VnpayPaymentRequest};
