//! Callback verification: signature checks and outcome classification.
//!
//! Mirrors the request pipeline in reverse. The signature field (and any
//! signature-type field) is stripped, the remainder re-canonicalized with the
//! same policy used at request time, and the received signature compared.
//! Only then is the processor's result code consulted.
//!
//! A malformed payload and a signature mismatch are distinct outcomes and
//! never collapse into each other.

use serde::{Deserialize, Serialize};

use crate::canonical::{encode, EncodingPolicy};
use crate::crypto::SignatureEngine;
use crate::params::ParameterSet;

/// Acknowledgement code for a forged or tampered callback.
pub const CHECKSUM_FAILED_CODE: &str = "97";

/// Acknowledgement code for a callback that could not be parsed.
pub const UNKNOWN_ERROR_CODE: &str = "99";

/// How one processor lays out its signed callbacks.
#[derive(Debug, Clone, Copy)]
pub struct CallbackRules {
    /// Field carrying the hex signature.
    pub signature_field: &'static str,
    /// Extra fields excluded from the canonical string (e.g. a hash-type marker).
    pub strip_fields: &'static [&'static str],
    /// Canonicalization used when the processor signed the callback.
    pub policy: EncodingPolicy,
    /// Field carrying the processor's result/response code.
    pub result_code_field: &'static str,
    /// Result code meaning "paid".
    pub success_code: &'static str,
    /// Field carrying the processor's human-readable message, if any.
    pub message_field: Option<&'static str>,
}

/// Outcome of verifying one inbound callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    /// Authentic, and the processor reports success.
    Success { params: ParameterSet },
    /// Authentic, and the processor reports failure. Code and message pass through unchanged.
    Failed {
        code: String,
        message: Option<String>,
        params: ParameterSet,
    },
    /// The signature does not match. Nothing in the payload is trusted.
    SignatureMismatch,
    /// The payload could not be parsed far enough to reach a verification decision.
    MalformedInput { reason: String },
}

impl CallbackResult {
    /// Whether the callback was authentic.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failed { .. })
    }

    /// Whether the callback was authentic and successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The verified parameters, if the callback was authentic.
    pub fn verified_params(&self) -> Option<&ParameterSet> {
        match self {
            Self::Success { params } | Self::Failed { params, .. } => Some(params),
            Self::SignatureMismatch | Self::MalformedInput { .. } => None,
        }
    }

    fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl CallbackRules {
    /// Verify and classify an inbound callback.
    ///
    /// `injected` fields take part in the canonical string without being
    /// present in the callback (for example an access key known only from
    /// configuration). They override any inbound value of the same name.
    pub fn verify(
        &self,
        inbound: &ParameterSet,
        engine: &SignatureEngine,
        injected: &[(&str, &str)],
    ) -> CallbackResult {
        let received = match inbound.get(self.signature_field) {
            Some(sig) if !sig.is_empty() => sig,
            _ => return CallbackResult::malformed(format!("missing {}", self.signature_field)),
        };

        let code = match inbound.get(self.result_code_field) {
            Some(code) => code.to_string(),
            None => {
                return CallbackResult::malformed(format!("missing {}", self.result_code_field))
            }
        };

        let mut stripped: Vec<&str> = Vec::with_capacity(self.strip_fields.len() + 1);
        stripped.push(self.signature_field);
        stripped.extend_from_slice(self.strip_fields);
        let mut signed = inbound.without(&stripped);
        for (name, value) in injected {
            signed.insert(*name, *value);
        }

        let canonical = match encode(&signed, self.policy) {
            Ok(c) => c,
            Err(e) => return CallbackResult::malformed(e.to_string()),
        };

        if !engine.verify(&canonical, received) {
            return CallbackResult::SignatureMismatch;
        }

        let params = inbound.without(&stripped);
        if code == self.success_code {
            CallbackResult::Success { params }
        } else {
            let message = self
                .message_field
                .and_then(|f| inbound.get(f))
                .map(str::to_string);
            CallbackResult::Failed {
                code,
                message,
                params,
            }
        }
    }
}

/// The small `{resultCode, message}` reply a processor expects after a callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    pub result_code: String,
    pub message: String,
}

impl Acknowledgement {
    /// Build the acknowledgement for a verification outcome.
    ///
    /// `success_code` is the code this processor expects back on success.
    pub fn for_result(result: &CallbackResult, success_code: &str) -> Self {
        let (code, message) = match result {
            CallbackResult::Success { .. } => (success_code, "Confirm Success"),
            CallbackResult::Failed { code, .. } => (code.as_str(), "Payment failed"),
            CallbackResult::SignatureMismatch => (CHECKSUM_FAILED_CODE, "Checksum failed"),
            CallbackResult::MalformedInput { .. } => (UNKNOWN_ERROR_CODE, "Unknown error"),
        };
        Self {
            result_code: code.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{HexCase, HmacAlgorithm, SecretKey};

    const RULES: CallbackRules = CallbackRules {
        signature_field: "sig",
        strip_fields: &["sigType"],
        policy: EncodingPolicy::LexicographicUrlEncoded,
        result_code_field: "code",
        success_code: "00",
        message_field: Some("msg"),
    };

    fn engine() -> SignatureEngine {
        SignatureEngine::new(HmacAlgorithm::Sha512, HexCase::Lower, &SecretKey::new("k")).unwrap()
    }

    fn signed(params: ParameterSet) -> ParameterSet {
        let canonical = encode(&params, RULES.policy).unwrap();
        let sig = engine().sign(&canonical);
        params.with("sig", sig.as_str()).with("sigType", "HmacSHA512")
    }

    #[test]
    fn test_success() {
        let inbound = signed(ParameterSet::from_pairs([("code", "00"), ("ref", "A1")]));
        let result = RULES.verify(&inbound, &engine(), &[]);
        assert!(result.is_success());
        let params = result.verified_params().unwrap();
        assert_eq!(params.get("ref"), Some("A1"));
        assert!(!params.contains("sig"));
        assert!(!params.contains("sigType"));
    }

    #[test]
    fn test_failed_passes_code_and_message() {
        let inbound = signed(ParameterSet::from_pairs([("code", "24"), ("msg", "cancelled")]));
        match RULES.verify(&inbound, &engine(), &[]) {
            CallbackResult::Failed { code, message, .. } => {
                assert_eq!(code, "24");
                assert_eq!(message.as_deref(), Some("cancelled"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_code_is_mismatch() {
        let mut inbound = signed(ParameterSet::from_pairs([("code", "00")]));
        inbound.insert("code", "24");
        assert_eq!(
            RULES.verify(&inbound, &engine(), &[]),
            CallbackResult::SignatureMismatch
        );
    }

    #[test]
    fn test_missing_signature_is_malformed() {
        let inbound = ParameterSet::from_pairs([("code", "00")]);
        assert!(matches!(
            RULES.verify(&inbound, &engine(), &[]),
            CallbackResult::MalformedInput { .. }
        ));

        let inbound = inbound.with("sig", "");
        assert!(matches!(
            RULES.verify(&inbound, &engine(), &[]),
            CallbackResult::MalformedInput { .. }
        ));
    }

    #[test]
    fn test_injected_fields_take_part_in_signature() {
        let base = ParameterSet::from_pairs([("code", "00")]);
        let with_key = base.clone().with("accessKey", "AK");
        let canonical = encode(&with_key, RULES.policy).unwrap();
        let inbound = base.with("sig", engine().sign(&canonical).as_str());

        assert!(RULES.verify(&inbound, &engine(), &[("accessKey", "AK")]).is_success());
        assert_eq!(
            RULES.verify(&inbound, &engine(), &[("accessKey", "other")]),
            CallbackResult::SignatureMismatch
        );
    }

    #[test]
    fn test_acknowledgement_codes() {
        let ack = Acknowledgement::for_result(&CallbackResult::SignatureMismatch, "00");
        assert_eq!(ack.result_code, "97");

        let ack = Acknowledgement::for_result(
            &CallbackResult::MalformedInput { reason: "x".into() },
            "00",
        );
        assert_eq!(ack.result_code, "99");
        assert_eq!(ack.message, "Unknown error");

        let ack = Acknowledgement::for_result(
            &CallbackResult::Success {
                params: ParameterSet::new(),
            },
            "00",
        );
        assert_eq!(ack.message, "Confirm Success");
        assert_eq!(
            serde_json::to_string(&ack).unwrap(),
            r#"{"resultCode":"00","message":"Confirm Success"}"#
        );
    }
}
