//! MoMo create-payment requests.
//!
//! The signature covers a fixed field list in MoMo's documented order. Values
//! are used verbatim, so URLs and free text are signed unescaped.

use paygate_core::{
    Amount, CanonicalString, Clock, EncodingPolicy, HmacAlgorithm, IdGenerator, ParameterSet,
    PaymentIntent, RejectReason, Signed, SignatureEngine, Validated,
};
use serde::{Deserialize, Serialize};

use crate::config::MomoConfig;

/// Fields covered by the create-request signature, in signing order.
pub const CREATE_FIELDS: &[&str] = &[
    "accessKey",
    "amount",
    "extraData",
    "ipnUrl",
    "orderId",
    "orderInfo",
    "partnerCode",
    "redirectUrl",
    "requestId",
    "requestType",
];

/// Order description used when the caller supplies none.
pub const DEFAULT_ORDER_INFO: &str = "Thanh toán MoMo";

/// What the storefront asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoPaymentRequest {
    #[serde(default)]
    pub amount: i64,
    pub order_info: Option<String>,
    pub extra_data: Option<String>,
}

/// JSON body POSTed to MoMo's create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoCreateRequest {
    pub partner_code: String,
    pub access_key: String,
    pub request_id: String,
    pub amount: String,
    pub order_id: String,
    pub order_info: String,
    pub redirect_url: String,
    pub ipn_url: String,
    pub extra_data: String,
    pub request_type: String,
    pub signature: String,
    pub lang: String,
}

/// An assembled create request together with the intent it was built from.
#[derive(Debug, Clone)]
pub struct MomoSignedRequest {
    pub intent: PaymentIntent,
    pub canonical: CanonicalString,
    pub body: MomoCreateRequest,
}

/// Validates, signs and assembles MoMo create requests.
#[derive(Debug, Clone)]
pub struct MomoRequestBuilder {
    config: MomoConfig,
    engine: SignatureEngine,
}

impl MomoRequestBuilder {
    /// Create a builder. Incomplete configuration is refused up front.
    pub fn new(config: MomoConfig) -> Result<Self, RejectReason> {
        config.validate()?;
        let engine = SignatureEngine::new(
            HmacAlgorithm::Sha256,
            config.signature_case,
            &config.secret_key,
        )?;
        Ok(Self { config, engine })
    }

    /// The configuration in use.
    pub fn config(&self) -> &MomoConfig {
        &self.config
    }

    /// Run the whole pipeline for one request with fresh identifiers.
    pub fn build(
        &self,
        request: &MomoPaymentRequest,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<MomoSignedRequest, RejectReason> {
        let validated = self.validate(request, ids, clock)?;
        let signed = validated.canonicalize()?.sign(&self.engine);
        tracing::debug!(
            order_id = %signed.intent.order_id,
            canonical = %signed.canonical,
            "momo create request signed"
        );
        self.assemble(signed)
    }

    /// Validate the request and mint the intent and parameter set.
    pub fn validate(
        &self,
        request: &MomoPaymentRequest,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Validated, RejectReason> {
        let amount = Amount::new(request.amount)?;
        let scaled = amount.scaled(self.config.amount_multiplier)?;
        let order_info = request
            .order_info
            .clone()
            .unwrap_or_else(|| DEFAULT_ORDER_INFO.to_string());

        let intent = PaymentIntent::mint(amount, order_info, &self.config.lang, None, ids, clock);

        let params = ParameterSet::new()
            .with("accessKey", &self.config.access_key)
            .with("amount", scaled.to_string())
            .with("extraData", request.extra_data.clone().unwrap_or_default())
            .with("ipnUrl", &self.config.notify_url)
            .with("orderId", intent.order_id.as_str())
            .with("orderInfo", &intent.order_info)
            .with("partnerCode", &self.config.partner_code)
            .with("redirectUrl", &self.config.return_url)
            .with("requestId", intent.request_id.as_str())
            .with("requestType", &self.config.request_type)
            .with("lang", &self.config.lang);

        Ok(Validated::new(
            intent,
            params,
            EncodingPolicy::FixedOrderRaw(CREATE_FIELDS),
        ))
    }

    /// Assemble the JSON body. The signature travels beside the signed fields.
    pub fn assemble(&self, signed: Signed) -> Result<MomoSignedRequest, RejectReason> {
        let p = &signed.params;
        let body = MomoCreateRequest {
            partner_code: p.require("partnerCode")?.to_string(),
            access_key: p.require("accessKey")?.to_string(),
            request_id: p.require("requestId")?.to_string(),
            amount: p.require("amount")?.to_string(),
            order_id: p.require("orderId")?.to_string(),
            order_info: p.require("orderInfo")?.to_string(),
            redirect_url: p.require("redirectUrl")?.to_string(),
            ipn_url: p.require("ipnUrl")?.to_string(),
            extra_data: p.require("extraData")?.to_string(),
            request_type: p.require("requestType")?.to_string(),
            signature: signed.signature.as_str().to_string(),
            lang: p.require("lang")?.to_string(),
        };
        Ok(MomoSignedRequest {
            intent: signed.intent,
            canonical: signed.canonical,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use paygate_core::{HexCase, SecretKey};
    use std::sync::Mutex;

    struct ScriptedIds(Mutex<Vec<&'static str>>);

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> String {
            self.0.lock().unwrap().remove(0).to_string()
        }
    }

    struct Fixed;

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 1, 14, 5, 0, 0).unwrap()
        }
    }

    fn reference_config() -> MomoConfig {
        MomoConfig {
            partner_code: "P".into(),
            access_key: "AK".into(),
            secret_key: SecretKey::new("secret"),
            return_url: "https://x/r".into(),
            notify_url: "https://x/n".into(),
            request_type: "T".into(),
            ..MomoConfig::default()
        }
    }

    fn request(amount: i64) -> MomoPaymentRequest {
        MomoPaymentRequest {
            amount,
            order_info: Some("pay".into()),
            extra_data: None,
        }
    }

    #[test]
    fn test_fixed_order_reference_signature() {
        let builder = MomoRequestBuilder::new(reference_config()).unwrap();
        let ids = ScriptedIds(Mutex::new(vec!["O1", "R1"]));

        let signed = builder.build(&request(1000), &ids, &Fixed).unwrap();

        assert_eq!(
            signed.canonical.as_str(),
            "accessKey=AK&amount=1000&extraData=&ipnUrl=https://x/n&orderId=O1\
             &orderInfo=pay&partnerCode=P&redirectUrl=https://x/r&requestId=R1&requestType=T"
        );
        assert_eq!(
            signed.body.signature,
            "bbb9a0056150efa4aa11dcc595c7eaa130b2b955f283dcfc4a7b8b8768cc1521"
        );
        assert_eq!(signed.body.order_id, "O1");
        assert_eq!(signed.body.request_id, "R1");
        assert_eq!(signed.body.amount, "1000");
        assert_eq!(signed.body.lang, "vi");
    }

    #[test]
    fn test_upper_case_signature_convention() {
        let config = MomoConfig {
            signature_case: HexCase::Upper,
            ..reference_config()
        };
        let builder = MomoRequestBuilder::new(config).unwrap();
        let ids = ScriptedIds(Mutex::new(vec!["O1", "R1"]));
        let signed = builder.build(&request(1000), &ids, &Fixed).unwrap();
        assert_eq!(
            signed.body.signature,
            "BBB9A0056150EFA4AA11DCC595C7EAA130B2B955F283DCFC4A7B8B8768CC1521"
        );
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        let builder = MomoRequestBuilder::new(reference_config()).unwrap();
        let ids = ScriptedIds(Mutex::new(vec!["O1", "R1", "O2", "R2"]));
        assert_eq!(
            builder.build(&request(0), &ids, &Fixed).unwrap_err(),
            RejectReason::InvalidAmount(0)
        );
        assert_eq!(
            builder.build(&request(-10), &ids, &Fixed).unwrap_err(),
            RejectReason::InvalidAmount(-10)
        );
        // Rejected before any identifier was minted
        assert_eq!(ids.0.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_default_order_info_and_json_shape() {
        let builder = MomoRequestBuilder::new(reference_config()).unwrap();
        let ids = ScriptedIds(Mutex::new(vec!["O1", "R1"]));
        let req = MomoPaymentRequest {
            amount: 50_000,
            order_info: None,
            extra_data: Some("eyJ1c2VyIjoxfQ==".into()),
        };
        let signed = builder.build(&req, &ids, &Fixed).unwrap();
        assert_eq!(signed.body.order_info, DEFAULT_ORDER_INFO);
        assert_eq!(signed.body.extra_data, "eyJ1c2VyIjoxfQ==");

        let json = serde_json::to_value(&signed.body).unwrap();
        for key in [
            "partnerCode",
            "accessKey",
            "requestId",
            "amount",
            "orderId",
            "orderInfo",
            "redirectUrl",
            "ipnUrl",
            "extraData",
            "requestType",
            "signature",
            "lang",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_incomplete_config_fails_fast() {
        let config = MomoConfig {
            secret_key: SecretKey::default(),
            ..reference_config()
        };
        assert!(matches!(
            MomoRequestBuilder::new(config),
            Err(RejectReason::Configuration(_))
        ));
    }
}
