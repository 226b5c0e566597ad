//! Adapters from raw inbound payloads to [`ParameterSet`]s.
//!
//! Loose payload shapes are tolerated here and nowhere else. The verifiers
//! only ever see a flat set of text fields.

use paygate_core::ParameterSet;
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Parse a URL query string (with or without the leading `?`).
///
/// `+` decodes to a space. Invalid UTF-8 after decoding and repeated field
/// names are malformed input.
pub fn parse_query(query: &str) -> Result<ParameterSet> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = ParameterSet::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_name, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode_component(raw_name)?;
        let value = decode_component(raw_value)?;
        if name.is_empty() {
            return Err(GatewayError::MalformedInput("empty field name".into()));
        }
        if params.contains(&name) {
            return Err(GatewayError::MalformedInput(format!(
                "repeated field: {}",
                name
            )));
        }
        params.insert(name, value);
    }
    Ok(params)
}

fn decode_component(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .map_err(|_| GatewayError::MalformedInput("query is not valid UTF-8".into()))
}

/// Flatten a JSON object body.
///
/// Strings are taken verbatim, numbers and booleans as their JSON text, and
/// `null` fields are dropped. Arrays and nested objects are malformed input.
pub fn flatten_json(body: &[u8]) -> Result<ParameterSet> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::MalformedInput(format!("invalid JSON: {}", e)))?;
    let object = match value {
        Value::Object(object) => object,
        _ => {
            return Err(GatewayError::MalformedInput(
                "expected a JSON object".into(),
            ))
        }
    };

    let mut params = ParameterSet::new();
    for (name, value) in object {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(GatewayError::MalformedInput(format!(
                    "field {} is not a scalar",
                    name
                )))
            }
        };
        params.insert(name, text);
    }
    Ok(params)
}
