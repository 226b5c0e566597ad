//! Classification of MoMo's create-payment response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A payment MoMo accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomoPayment {
    pub pay_url: String,
    pub deeplink: Option<String>,
    pub qr_code_url: Option<String>,
    pub order_id: Option<String>,
    pub request_id: Option<String>,
}

/// What a create call amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MomoCreateOutcome {
    /// MoMo returned a `payUrl`.
    Created(MomoPayment),
    /// MoMo answered with a well-formed refusal. Fields pass through unchanged.
    Rejected {
        message: Option<String>,
        local_message: Option<String>,
        result_code: Option<String>,
        error_code: Option<String>,
    },
    /// No usable answer: non-2xx without a MoMo body, empty or unparseable body.
    Unavailable { reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    order_id: Option<String>,
    request_id: Option<String>,
    message: Option<String>,
    local_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_code")]
    result_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_code")]
    error_code: Option<String>,
    pay_url: Option<String>,
    deeplink: Option<String>,
    qr_code_url: Option<String>,
}

impl RawResponse {
    fn is_momo_body(&self) -> bool {
        self.message.is_some() || self.result_code.is_some() || self.error_code.is_some()
    }

    fn into_rejection(self) -> MomoCreateOutcome {
        MomoCreateOutcome::Rejected {
            message: self.message,
            local_message: self.local_message,
            result_code: self.result_code,
            error_code: self.error_code,
        }
    }
}

/// MoMo codes arrive as numbers in v2 and as strings in older gateways.
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Classify an HTTP status and body from the create endpoint.
pub fn interpret_response(status: u16, body: &[u8]) -> MomoCreateOutcome {
    let success = (200..300).contains(&status);

    if body.iter().all(u8::is_ascii_whitespace) {
        return MomoCreateOutcome::Unavailable {
            reason: format!("empty response body (status {})", status),
        };
    }

    let raw: RawResponse = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(e) => {
            return MomoCreateOutcome::Unavailable {
                reason: format!("unparseable response body (status {}): {}", status, e),
            }
        }
    };

    if !success {
        if raw.is_momo_body() {
            return raw.into_rejection();
        }
        return MomoCreateOutcome::Unavailable {
            reason: format!("unexpected status {}", status),
        };
    }

    match raw.pay_url.clone() {
        Some(pay_url) if !pay_url.is_empty() => MomoCreateOutcome::Created(MomoPayment {
            pay_url,
            deeplink: raw.deeplink,
            qr_code_url: raw.qr_code_url,
            order_id: raw.order_id,
            request_id: raw.request_id,
        }),
        _ => raw.into_rejection(),
    }
}
