//! VNPAY IPN and return-URL verification.
//!
//! Both legs carry the same signed `vnp_*` set. `vnp_SecureHash` and
//! `vnp_SecureHashType` are removed, the rest is re-sorted and re-encoded
//! exactly as at request time, and the hash compared.

use paygate_core::{
    Acknowledgement, CallbackResult, CallbackRules, EncodingPolicy, HmacAlgorithm, ParameterSet,
    RejectReason, SignatureEngine,
};
use serde::{Deserialize, Serialize};

use crate::config::VnpayConfig;

/// `vnp_ResponseCode` of a completed payment.
pub const SUCCESS_CODE: &str = "00";

const RULES: CallbackRules = CallbackRules {
    signature_field: "vnp_SecureHash",
    strip_fields: &["vnp_SecureHashType"],
    policy: EncodingPolicy::LexicographicUrlEncoded,
    result_code_field: "vnp_ResponseCode",
    success_code: SUCCESS_CODE,
    message_field: None,
};

/// The `{RspCode, Message}` body VNPAY expects in reply to an IPN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VnpayAcknowledgement {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl From<Acknowledgement> for VnpayAcknowledgement {
    fn from(ack: Acknowledgement) -> Self {
        Self {
            rsp_code: ack.result_code,
            message: ack.message,
        }
    }
}

/// Verifies VNPAY callbacks (IPN and browser return).
#[derive(Debug, Clone)]
pub struct VnpayVerifier {
    engine: SignatureEngine,
}

impl VnpayVerifier {
    pub fn new(config: &VnpayConfig) -> Result<Self, RejectReason> {
        config.validate()?;
        let engine = SignatureEngine::new(
            HmacAlgorithm::Sha512,
            config.signature_case,
            &config.secret_key,
        )?;
        Ok(Self { engine })
    }

    /// Verify one callback's query parameters.
    pub fn verify(&self, inbound: &ParameterSet) -> CallbackResult {
        let result = RULES.verify(inbound, &self.engine, &[]);
        let txn_ref = inbound.get("vnp_TxnRef");
        match &result {
            CallbackResult::Success { .. } => {
                tracing::info!(txn_ref = ?txn_ref, "vnpay callback verified: paid")
            }
            CallbackResult::Failed { code, .. } => {
                tracing::info!(txn_ref = ?txn_ref, code = %code, "vnpay callback verified: failed")
            }
            CallbackResult::SignatureMismatch => {
                tracing::warn!(txn_ref = ?txn_ref, "vnpay callback checksum failed")
            }
            CallbackResult::MalformedInput { reason } => {
                tracing::warn!(reason = %reason, "vnpay callback malformed")
            }
        }
        result
    }

    /// The IPN reply for a verification outcome.
    pub fn acknowledge(result: &CallbackResult) -> VnpayAcknowledgement {
        Acknowledgement::for_result(result, SUCCESS_CODE).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paygate_core::{encode, HexCase, SecretKey};

    fn config() -> VnpayConfig {
        VnpayConfig {
            tmn_code: "DEMO0001".into(),
            secret_key: SecretKey::new("VNPAYSECRET"),
            return_url: "https://shop.example/vnpay-return".into(),
            ..VnpayConfig::default()
        }
    }

    fn callback(response_code: &str) -> ParameterSet {
        let fields = ParameterSet::new()
            .with("vnp_Amount", "100000")
            .with("vnp_BankCode", "NCB")
            .with("vnp_OrderInfo", "Thanh toan don hang")
            .with("vnp_PayDate", "20260114120312")
            .with("vnp_ResponseCode", response_code)
            .with("vnp_TmnCode", "DEMO0001")
            .with("vnp_TransactionNo", "14422574")
            .with("vnp_TransactionStatus", response_code)
            .with("vnp_TxnRef", "TXN1");
        let canonical = encode(&fields, EncodingPolicy::LexicographicUrlEncoded).unwrap();
        let engine = SignatureEngine::new(
            HmacAlgorithm::Sha512,
            HexCase::Lower,
            &SecretKey::new("VNPAYSECRET"),
        )
        .unwrap();
        fields
            .with("vnp_SecureHashType", "HmacSHA512")
            .with("vnp_SecureHash", engine.sign(&canonical).as_str())
    }

    #[test]
    fn test_success_and_failed_codes() {
        let verifier = VnpayVerifier::new(&config()).unwrap();

        let result = verifier.verify(&callback("00"));
        assert!(result.is_success());
        let params = result.verified_params().unwrap();
        assert!(!params.contains("vnp_SecureHash"));
        assert!(!params.contains("vnp_SecureHashType"));

        match verifier.verify(&callback("24")) {
            CallbackResult::Failed { code, .. } => assert_eq!(code, "24"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_upper_case_hash_verifies() {
        let verifier = VnpayVerifier::new(&config()).unwrap();
        let mut inbound = callback("00");
        let upper = inbound.get("vnp_SecureHash").unwrap().to_uppercase();
        inbound.insert("vnp_SecureHash", upper);
        assert!(verifier.verify(&inbound).is_success());
    }

    #[test]
    fn test_missing_hash_is_malformed_not_mismatch() {
        let verifier = VnpayVerifier::new(&config()).unwrap();
        let inbound = callback("00").without(&["vnp_SecureHash"]);
        let result = verifier.verify(&inbound);
        assert!(matches!(result, CallbackResult::MalformedInput { .. }));
        assert_ne!(result, CallbackResult::SignatureMismatch);
        assert_eq!(VnpayVerifier::acknowledge(&result).rsp_code, "99");
    }

    #[test]
    fn test_tampered_amount() {
        let verifier = VnpayVerifier::new(&config()).unwrap();
        let mut inbound = callback("00");
        inbound.insert("vnp_Amount", "100");
        let result = verifier.verify(&inbound);
        assert_eq!(result, CallbackResult::SignatureMismatch);

        let ack = VnpayVerifier::acknowledge(&result);
        assert_eq!(
            serde_json::to_string(&ack).unwrap(),
            r#"{"RspCode":"97","Message":"Checksum failed"}"#
        );
    }

    #[test]
    fn test_wrong_secret_is_mismatch() {
        let verifier = VnpayVerifier::new(&VnpayConfig {
            secret_key: SecretKey::new("OTHER"),
            ..config()
        })
        .unwrap();
        assert_eq!(
            verifier.verify(&callback("00")),
            CallbackResult::SignatureMismatch
        );
    }
}
