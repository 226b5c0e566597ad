//! MoMo IPN verification.
//!
//! MoMo signs its IPN over a fixed field list with raw values. `accessKey` is
//! part of that list but never sent back, so it is taken from configuration.

use paygate_core::{
    Acknowledgement, CallbackResult, CallbackRules, EncodingPolicy, HmacAlgorithm, ParameterSet,
    RejectReason, SignatureEngine,
};

use crate::config::MomoConfig;

/// Fields covered by the IPN signature, in signing order.
pub const IPN_FIELDS: &[&str] = &[
    "accessKey",
    "amount",
    "extraData",
    "message",
    "orderId",
    "orderInfo",
    "orderType",
    "partnerCode",
    "payType",
    "requestId",
    "responseTime",
    "resultCode",
    "transId",
];

/// `resultCode` of a completed payment.
pub const SUCCESS_CODE: &str = "0";

const RULES: CallbackRules = CallbackRules {
    signature_field: "signature",
    strip_fields: &[],
    policy: EncodingPolicy::FixedOrderRaw(IPN_FIELDS),
    result_code_field: "resultCode",
    success_code: SUCCESS_CODE,
    message_field: Some("message"),
};

/// Verifies IPN callbacks posted by MoMo.
#[derive(Debug, Clone)]
pub struct MomoIpnVerifier {
    access_key: String,
    engine: SignatureEngine,
}

impl MomoIpnVerifier {
    pub fn new(config: &MomoConfig) -> Result<Self, RejectReason> {
        config.validate()?;
        let engine = SignatureEngine::new(
            HmacAlgorithm::Sha256,
            config.signature_case,
            &config.secret_key,
        )?;
        Ok(Self {
            access_key: config.access_key.clone(),
            engine,
        })
    }

    /// Verify one IPN payload, already flattened to text values.
    pub fn verify(&self, inbound: &ParameterSet) -> CallbackResult {
        let result = RULES.verify(inbound, &self.engine, &[("accessKey", self.access_key.as_str())]);
        match &result {
            CallbackResult::Success { .. } => {
                tracing::info!(order_id = ?inbound.get("orderId"), "momo ipn verified: paid")
            }
            CallbackResult::Failed { code, .. } => {
                tracing::info!(order_id = ?inbound.get("orderId"), code = %code, "momo ipn verified: failed")
            }
            CallbackResult::SignatureMismatch => {
                tracing::warn!(order_id = ?inbound.get("orderId"), "momo ipn signature mismatch")
            }
            CallbackResult::MalformedInput { reason } => {
                tracing::warn!(reason = %reason, "momo ipn malformed")
            }
        }
        result
    }

    /// The reply MoMo expects for a verification outcome.
    pub fn acknowledge(result: &CallbackResult) -> Acknowledgement {
        Acknowledgement::for_result(result, SUCCESS_CODE)
    }
}
