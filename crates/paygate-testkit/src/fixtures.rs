//! Test fixtures and helpers.
//!
//! Deterministic collaborators, sandbox-shaped configurations and callbacks
//! signed the way the processors sign them.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use paygate_core::canonical::query_string;
use paygate_core::{
    encode, Clock, EncodingPolicy, HmacAlgorithm, IdGenerator, ParameterSet, SignatureEngine,
};
use paygate_momo::{MomoConfig, IPN_FIELDS};
use paygate_vnpay::VnpayConfig;

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Default for FixedClock {
    /// 2026-01-14T05:00:00Z, i.e. 12:00 in Hanoi.
    fn default() -> Self {
        Self(Utc.timestamp_opt(1_768_366_800, 0).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Identifiers `<prefix>-000001`, `<prefix>-000002`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: &'static str,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }

    /// How many identifiers were handed out.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst) - 1
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("ID")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{:06}", self.prefix, n)
    }
}

/// MoMo configuration with the public sandbox test credentials.
pub fn momo_config() -> MomoConfig {
    MomoConfig {
        partner_code: "MOMO".into(),
        access_key: "F8BBA842ECF85".into(),
        secret_key: "K951B6PE1waDMi640xX08PD3vg6EKvLz".into(),
        return_url: "https://shop.example/momo-return".into(),
        notify_url: "https://api.example/api/payments/momo/notify".into(),
        ..MomoConfig::default()
    }
}

/// VNPAY configuration with a made-up terminal.
pub fn vnpay_config() -> VnpayConfig {
    VnpayConfig {
        tmn_code: "DEMO0001".into(),
        secret_key: "VNPAYSECRET".into(),
        return_url: "https://shop.example/vnpay-return".into(),
        ..VnpayConfig::default()
    }
}

/// An IPN payload as MoMo would post it, signed with `config`'s secret.
pub fn signed_momo_ipn(
    config: &MomoConfig,
    order_id: &str,
    amount: u64,
    result_code: &str,
) -> ParameterSet {
    let message = if result_code == "0" {
        "Successful."
    } else {
        "Transaction denied by user."
    };
    let fields = ParameterSet::new()
        .with("partnerCode", &config.partner_code)
        .with("orderId", order_id)
        .with("requestId", order_id)
        .with("amount", amount.to_string())
        .with("orderInfo", "Thanh toán MoMo")
        .with("orderType", "momo_wallet")
        .with("transId", "4088878653")
        .with("resultCode", result_code)
        .with("message", message)
        .with("payType", "qr")
        .with("responseTime", "1768366812000")
        .with("extraData", "");

    let canonical = match encode(
        &fields.clone().with("accessKey", &config.access_key),
        EncodingPolicy::FixedOrderRaw(IPN_FIELDS),
    ) {
        Ok(c) => c,
        Err(_) => return fields,
    };
    match SignatureEngine::new(HmacAlgorithm::Sha256, config.signature_case, &config.secret_key) {
        Ok(engine) => fields.with("signature", engine.sign(&canonical).as_str()),
        Err(_) => fields,
    }
}

/// The same IPN as a JSON body, with numeric fields as JSON numbers.
pub fn signed_momo_ipn_json(
    config: &MomoConfig,
    order_id: &str,
    amount: u64,
    result_code: &str,
) -> Vec<u8> {
    let params = signed_momo_ipn(config, order_id, amount, result_code);
    let mut body = serde_json::Map::new();
    for (name, value) in params.iter() {
        let json = match name {
            "amount" | "transId" | "resultCode" | "responseTime" => value
                .parse::<u64>()
                .map(serde_json::Value::from)
                .unwrap_or_else(|_| serde_json::Value::from(value)),
            _ => serde_json::Value::from(value),
        };
        body.insert(name.to_string(), json);
    }
    serde_json::Value::Object(body).to_string().into_bytes()
}

/// A VNPAY callback parameter set, signed with `config`'s secret.
///
/// `amount` is in VNPAY's minor unit (already multiplied by 100).
pub fn signed_vnpay_callback(
    config: &VnpayConfig,
    txn_ref: &str,
    amount: u64,
    response_code: &str,
) -> ParameterSet {
    let fields = ParameterSet::new()
        .with("vnp_Amount", amount.to_string())
        .with("vnp_BankCode", "NCB")
        .with("vnp_BankTranNo", "VNP14422574")
        .with("vnp_CardType", "ATM")
        .with("vnp_OrderInfo", "Thanh toan don hang")
        .with("vnp_PayDate", "20260114120312")
        .with("vnp_ResponseCode", response_code)
        .with("vnp_TmnCode", &config.tmn_code)
        .with("vnp_TransactionNo", "14422574")
        .with("vnp_TransactionStatus", response_code)
        .with("vnp_TxnRef", txn_ref);

    let canonical = match encode(&fields, EncodingPolicy::LexicographicUrlEncoded) {
        Ok(c) => c,
        Err(_) => return fields,
    };
    match SignatureEngine::new(HmacAlgorithm::Sha512, config.signature_case, &config.secret_key) {
        Ok(engine) => fields
            .with("vnp_SecureHashType", "HmacSHA512")
            .with("vnp_SecureHash", engine.sign(&canonical).as_str()),
        Err(_) => fields,
    }
}

/// Render a parameter set as the query string a browser or VNPAY would send.
pub fn to_query(params: &ParameterSet) -> String {
    query_string(params)
}
