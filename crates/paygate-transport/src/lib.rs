//! # Paygate Transport
//!
//! Delivery of signed requests to payment processors.
//!
//! The signing core never performs I/O. Whatever must reach a processor over
//! the network goes through a [`Transport`], so the facade can be driven by
//! the scripted in-memory implementation in tests and by `reqwest` in
//! production.
//!
//! ## Key Types
//!
//! - [`Transport`] - Async POST of a JSON body, returning status and raw body
//! - [`memory::ScriptedTransport`] - Replays canned responses and records requests
//! - [`http::ReqwestTransport`] - HTTPS client with bounded timeouts (feature `http`)

pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;

use async_trait::async_trait;

pub use error::TransportError;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Status and body of a processor's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound channel to a processor.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as `application/json` to `url`.
    ///
    /// Any HTTP status is returned as `Ok`; only delivery failures are errors.
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse>;
}
