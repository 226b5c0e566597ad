//! VNPAY merchant configuration.

use chrono::FixedOffset;
use paygate_core::{HexCase, RejectReason, SecretKey};
use serde::{Deserialize, Serialize};

/// Sandbox payment page.
pub const SANDBOX_ENDPOINT: &str = "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html";

/// Configuration for the VNPAY integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VnpayConfig {
    /// Payment page the buyer is redirected to.
    pub endpoint_url: String,
    /// Terminal code issued by VNPAY (`vnp_TmnCode`).
    pub tmn_code: String,
    /// Shared HMAC secret (`vnp_HashSecret`).
    pub secret_key: SecretKey,
    /// Where VNPAY sends the buyer back (`vnp_ReturnUrl`).
    pub return_url: String,
    pub version: String,
    pub command: String,
    pub currency: String,
    /// Order type used when the caller supplies none.
    pub order_type: String,
    /// Locale used when the caller supplies none.
    pub locale: String,
    /// VNPAY amounts are in hundredths of a đồng.
    pub amount_multiplier: u64,
    /// Offset in which `vnp_CreateDate` and `vnp_ExpireDate` are rendered.
    pub utc_offset_hours: i32,
    /// Lifetime of a payment URL in minutes. Zero omits `vnp_ExpireDate`.
    pub expire_minutes: u32,
    /// Hex case of outbound signatures.
    pub signature_case: HexCase,
}

impl Default for VnpayConfig {
    fn default() -> Self {
        Self {
            endpoint_url: SANDBOX_ENDPOINT.to_string(),
            tmn_code: String::new(),
            secret_key: SecretKey::default(),
            return_url: String::new(),
            version: "2.1.0".to_string(),
            command: "pay".to_string(),
            currency: "VND".to_string(),
            order_type: "other".to_string(),
            locale: "vn".to_string(),
            amount_multiplier: 100,
            utc_offset_hours: 7,
            expire_minutes: 15,
            signature_case: HexCase::Lower,
        }
    }
}

impl VnpayConfig {
    /// Fail fast on anything a payment URL or callback check would need.
    pub fn validate(&self) -> Result<(), RejectReason> {
        let required = [
            ("endpoint_url", &self.endpoint_url),
            ("tmn_code", &self.tmn_code),
            ("return_url", &self.return_url),
            ("version", &self.version),
            ("command", &self.command),
            ("currency", &self.currency),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.is_empty()) {
            return Err(RejectReason::Configuration(format!("vnpay.{}", field)));
        }
        if self.secret_key.is_empty() {
            return Err(RejectReason::Configuration("vnpay.secret_key".into()));
        }
        if self.amount_multiplier == 0 {
            return Err(RejectReason::Configuration("vnpay.amount_multiplier".into()));
        }
        self.offset()?;
        Ok(())
    }

    /// The configured UTC offset.
    pub fn offset(&self) -> Result<FixedOffset, RejectReason> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| RejectReason::Configuration("vnpay.utc_offset_hours".into()))
    }
}
