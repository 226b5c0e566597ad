//! VNPAY payment URLs.
//!
//! The canonical string doubles as the query string, so the URL the buyer
//! follows is exactly what was signed plus `vnp_SecureHash`.

use chrono::Duration;
use paygate_core::{
    Amount, CanonicalString, Clock, EncodingPolicy, HmacAlgorithm, IdGenerator, ParameterSet,
    PaymentIntent, RejectReason, SignatureEngine, Signed, Timestamp14, Validated,
};
use serde::{Deserialize, Serialize};

use crate::config::VnpayConfig;

/// Order description used when the caller supplies none.
pub const DEFAULT_ORDER_INFO: &str = "Thanh toan don hang";

const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// What the storefront asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnpayPaymentRequest {
    #[serde(default)]
    pub amount: i64,
    pub order_info: Option<String>,
    pub order_type: Option<String>,
    pub bank_code: Option<String>,
    pub language: Option<String>,
    pub client_ip: Option<String>,
}

/// A signed payment URL with the intent it was built from.
#[derive(Debug, Clone)]
pub struct VnpaySignedRequest {
    pub intent: PaymentIntent,
    pub canonical: CanonicalString,
    pub payment_url: String,
}

impl VnpaySignedRequest {
    /// The merchant reference sent as `vnp_TxnRef`.
    pub fn txn_ref(&self) -> &str {
        self.intent.order_id.as_str()
    }

    /// The reply handed back to the storefront.
    pub fn to_result(&self) -> VnpayCreateResult {
        VnpayCreateResult {
            code: "00".to_string(),
            message: "success".to_string(),
            payment_url: self.payment_url.clone(),
            txn_ref: self.txn_ref().to_string(),
        }
    }
}

/// Create-payment reply for VNPAY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnpayCreateResult {
    pub code: String,
    pub message: String,
    pub payment_url: String,
    pub txn_ref: String,
}

/// Validates, signs and assembles VNPAY payment URLs.
#[derive(Debug, Clone)]
pub struct VnpayRequestBuilder {
    config: VnpayConfig,
    engine: SignatureEngine,
}

impl VnpayRequestBuilder {
    /// Create a builder. Incomplete configuration is refused up front.
    pub fn new(config: VnpayConfig) -> Result<Self, RejectReason> {
        config.validate()?;
        let engine = SignatureEngine::new(
            HmacAlgorithm::Sha512,
            config.signature_case,
            &config.secret_key,
        )?;
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &VnpayConfig {
        &self.config
    }

    /// Run the whole pipeline for one request with fresh identifiers.
    pub fn build(
        &self,
        request: &VnpayPaymentRequest,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<VnpaySignedRequest, RejectReason> {
        let validated = self.validate(request, ids, clock)?;
        let signed = validated.canonicalize()?.sign(&self.engine);
        tracing::debug!(
            txn_ref = %signed.intent.order_id,
            canonical = %signed.canonical,
            "vnpay payment url signed"
        );
        Ok(self.assemble(signed))
    }

    /// Validate the request and mint the intent and parameter set.
    pub fn validate(
        &self,
        request: &VnpayPaymentRequest,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Validated, RejectReason> {
        let amount = Amount::new(request.amount)?;
        let scaled = amount.scaled(self.config.amount_multiplier)?;
        let offset = self.config.offset()?;

        let order_info = non_empty(&request.order_info).unwrap_or(DEFAULT_ORDER_INFO);
        let order_type = non_empty(&request.order_type).unwrap_or(self.config.order_type.as_str());
        let locale = non_empty(&request.language).unwrap_or(self.config.locale.as_str());
        let client_ip = non_empty(&request.client_ip).unwrap_or(DEFAULT_CLIENT_IP);

        let intent = PaymentIntent::mint(
            amount,
            order_info,
            locale,
            request.bank_code.clone(),
            ids,
            clock,
        );

        let expire_date = match self.config.expire_minutes {
            0 => None,
            minutes => {
                let expires_at = intent.created_at + Duration::minutes(i64::from(minutes));
                Some(Timestamp14::format(expires_at, offset))
            }
        };

        let params = ParameterSet::new()
            .with("vnp_Version", &self.config.version)
            .with("vnp_Command", &self.config.command)
            .with("vnp_TmnCode", &self.config.tmn_code)
            .with("vnp_Amount", scaled.to_string())
            .with("vnp_CurrCode", &self.config.currency)
            .with("vnp_TxnRef", intent.order_id.as_str())
            .with("vnp_OrderInfo", &intent.order_info)
            .with("vnp_OrderType", order_type)
            .with("vnp_Locale", &intent.locale)
            .with("vnp_ReturnUrl", &self.config.return_url)
            .with("vnp_IpAddr", client_ip)
            .with(
                "vnp_CreateDate",
                Timestamp14::format(intent.created_at, offset).as_str(),
            )
            .with_optional("vnp_ExpireDate", expire_date.as_ref().map(Timestamp14::as_str))
            .with_optional("vnp_BankCode", intent.bank_code.as_deref());

        Ok(Validated::new(
            intent,
            params,
            EncodingPolicy::LexicographicUrlEncoded,
        ))
    }

    /// Append the signature to the signed query string.
    pub fn assemble(&self, signed: Signed) -> VnpaySignedRequest {
        let payment_url = format!(
            "{}?{}&vnp_SecureHash={}",
            self.config.endpoint_url, signed.canonical, signed.signature
        );
        VnpaySignedRequest {
            intent: signed.intent,
            canonical: signed.canonical,
            payment_url,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
