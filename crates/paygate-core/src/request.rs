//! The outbound request pipeline: `Validated -> Canonicalized -> Signed`.
//!
//! Each stage consumes the previous one, so no path re-enters an earlier
//! state. Assembly into a processor artifact (JSON body, payment URL) happens
//! in the processor crates on top of [`Signed`]. Any failure short-circuits
//! into a terminal [`RejectReason`].

use thiserror::Error;

use crate::canonical::{encode, CanonicalString, EncodingPolicy};
use crate::crypto::{Signature, SignatureEngine};
use crate::error::CoreError;
use crate::intent::PaymentIntent;
use crate::params::ParameterSet;

/// Terminal rejection of a request before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("amount must be a positive integer, got {0}")]
    InvalidAmount(i64),

    #[error("amount overflows the processor's minor unit")]
    AmountOverflow,

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("processor configuration incomplete: {0}")]
    Configuration(String),
}

impl RejectReason {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid_amount",
            Self::AmountOverflow => "amount_overflow",
            Self::MissingField(_) => "missing_field",
            Self::Configuration(_) => "configuration",
        }
    }
}

impl From<CoreError> for RejectReason {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidAmount(v) => Self::InvalidAmount(v),
            CoreError::AmountOverflow(..) => Self::AmountOverflow,
            CoreError::MissingField(f) => Self::MissingField(f),
            CoreError::EmptySecret => Self::Configuration("secret key".into()),
        }
    }
}

/// A fully validated intent with its parameter set and encoding policy.
#[derive(Debug, Clone)]
pub struct Validated {
    intent: PaymentIntent,
    params: ParameterSet,
    policy: EncodingPolicy,
}

impl Validated {
    /// Enter the pipeline. Callers construct this only after validation passed.
    pub fn new(intent: PaymentIntent, params: ParameterSet, policy: EncodingPolicy) -> Self {
        Self {
            intent,
            params,
            policy,
        }
    }

    /// The intent being built.
    pub fn intent(&self) -> &PaymentIntent {
        &self.intent
    }

    /// The parameter set to be signed.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Build the canonical string. The parameter set is frozen from here on.
    pub fn canonicalize(self) -> Result<Canonicalized, RejectReason> {
        let canonical = encode(&self.params, self.policy)?;
        Ok(Canonicalized {
            intent: self.intent,
            params: self.params,
            canonical,
        })
    }
}

/// A request whose canonical string has been computed.
#[derive(Debug, Clone)]
pub struct Canonicalized {
    intent: PaymentIntent,
    params: ParameterSet,
    canonical: CanonicalString,
}

impl Canonicalized {
    /// The canonical string about to be signed.
    pub fn canonical(&self) -> &CanonicalString {
        &self.canonical
    }

    /// Sign the canonical string.
    pub fn sign(self, engine: &SignatureEngine) -> Signed {
        let signature = engine.sign(&self.canonical);
        Signed {
            intent: self.intent,
            params: self.params,
            canonical: self.canonical,
            signature,
        }
    }
}

/// A signed request, ready for processor-specific assembly.
#[derive(Debug, Clone)]
pub struct Signed {
    pub intent: PaymentIntent,
    pub params: ParameterSet,
    pub canonical: CanonicalString,
    pub signature: Signature,
}
