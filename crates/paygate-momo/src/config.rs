//! MoMo partner configuration.

use paygate_core::{HexCase, RejectReason, SecretKey};
use serde::{Deserialize, Serialize};

/// Sandbox create-payment endpoint.
pub const SANDBOX_ENDPOINT: &str = "https://test-payment.momo.vn/v2/gateway/api/create";

/// Configuration for the MoMo integration.
///
/// Immutable once handed to a builder or verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomoConfig {
    /// Create-payment endpoint.
    pub endpoint_url: String,
    /// Partner code issued by MoMo.
    pub partner_code: String,
    /// Access key issued by MoMo. Part of every signature.
    pub access_key: String,
    /// Shared HMAC secret.
    pub secret_key: SecretKey,
    /// Where MoMo redirects the buyer after payment (`redirectUrl`).
    pub return_url: String,
    /// Where MoMo posts the IPN (`ipnUrl`).
    pub notify_url: String,
    /// MoMo request type.
    pub request_type: String,
    /// Language of MoMo's hosted pages.
    pub lang: String,
    /// Factor applied to the amount before sending. MoMo takes whole đồng.
    pub amount_multiplier: u64,
    /// Hex case of outbound signatures.
    pub signature_case: HexCase,
}

impl Default for MomoConfig {
    fn default() -> Self {
        Self {
            endpoint_url: SANDBOX_ENDPOINT.to_string(),
            partner_code: String::new(),
            access_key: String::new(),
            secret_key: SecretKey::default(),
            return_url: String::new(),
            notify_url: String::new(),
            request_type: "captureMoMoWallet".to_string(),
            lang: "vi".to_string(),
            amount_multiplier: 1,
            signature_case: HexCase::Lower,
        }
    }
}

impl MomoConfig {
    /// Fail fast on anything a create call or IPN check would need.
    pub fn validate(&self) -> Result<(), RejectReason> {
        let required = [
            ("endpoint_url", self.endpoint_url.is_empty()),
            ("partner_code", self.partner_code.is_empty()),
            ("access_key", self.access_key.is_empty()),
            ("secret_key", self.secret_key.is_empty()),
            ("return_url", self.return_url.is_empty()),
            ("notify_url", self.notify_url.is_empty()),
            ("request_type", self.request_type.is_empty()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
            return Err(RejectReason::Configuration(format!("momo.{}", field)));
        }
        if self.amount_multiplier == 0 {
            return Err(RejectReason::Configuration("momo.amount_multiplier".into()));
        }
        Ok(())
    }
}
