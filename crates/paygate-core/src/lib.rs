//! # Paygate Core
//!
//! Pure primitives for Paygate: parameter canonicalization, keyed-hash
//! signatures, the payment-request state machine and callback verification.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over parameter sets and shared secrets.
//!
//! ## Key Types
//!
//! - [`ParameterSet`] - Named string parameters for one payment operation
//! - [`EncodingPolicy`] - How a processor turns parameters into signed bytes
//! - [`SignatureEngine`] - HMAC signer/verifier bound to one processor secret
//! - [`PaymentIntent`] - Freshly minted identifiers and amount for one "create" call
//! - [`CallbackResult`] - Outcome of verifying an inbound processor callback
//!
//! ## Canonicalization
//!
//! Processors disagree on how the signed string is built. See [`canonical`].

pub mod callback;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod intent;
pub mod params;
pub mod request;
pub mod types;

pub use callback::{Acknowledgement, CallbackResult, CallbackRules};
pub use canonical::{encode, CanonicalString, EncodingPolicy};
pub use crypto::{HexCase, HmacAlgorithm, SecretKey, Signature, SignatureEngine};
pub use error::{CoreError, Result};
pub use intent::{Clock, IdGenerator, PaymentIntent, SystemClock, UuidGenerator};
pub use params::ParameterSet;
pub use request::{Canonicalized, RejectReason, Signed, Validated};
pub use types::{Amount, OrderId, RequestId, Timestamp14};
