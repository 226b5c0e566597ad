//! # Paygate Testkit
//!
//! Testing utilities for Paygate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Parameter sets with their expected canonical strings and signatures
//! - **Generators**: Proptest strategies for parameter sets and tampering
//! - **Fixtures**: Deterministic clocks and ids, sandbox configs, signed callbacks
//!
//! ## Golden Vectors
//!
//! ```rust
//! use paygate_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, signature) in verify_all_vectors() {
//!     assert!(ok, "{} produced {}", name, signature);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use paygate_core::{encode, EncodingPolicy};
//! use paygate_testkit::generators::parameter_set;
//!
//! proptest! {
//!     #[test]
//!     fn canonical_is_deterministic(params in parameter_set(8)) {
//!         let a = encode(&params, EncodingPolicy::LexicographicUrlEncoded).unwrap();
//!         let b = encode(&params, EncodingPolicy::LexicographicUrlEncoded).unwrap();
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    momo_config, signed_momo_ipn, signed_momo_ipn_json, signed_vnpay_callback, to_query,
    vnpay_config, FixedClock, SequentialIds,
};
pub use generators::{field_name, field_value, parameter_set};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
