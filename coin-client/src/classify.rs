//! Response classification.
//!
//! Pure functions: status code + envelope in, payload or typed error out.

use serde_json::Value;

use coin_types::{CurrencyError, CurrencyId};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Maps an upstream response to the envelope or a typed error.
///
/// | status | result |
/// |--------|--------|
/// | 200    | `Ok(body)` |
/// | 429    | [`CurrencyError::RateLimited`] |
/// | 401    | [`CurrencyError::Unauthenticated`] |
/// | other  | [`CurrencyError::UpstreamFailure`] with `status.error_message` |
pub fn classify(status: u16, body: Value) -> Result<Value, CurrencyError> {
    match status {
        200 => Ok(body),
        429 => Err(CurrencyError::RateLimited),
        401 => Err(CurrencyError::Unauthenticated),
        _ => Err(CurrencyError::UpstreamFailure(error_message(&body))),
    }
}

/// Extracts `status.error_message`, falling back to a placeholder.
pub fn error_message(body: &Value) -> String {
    body.get("status")
        .and_then(|s| s.get("error_message"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}

/// The `data` sequence of a listings envelope. Anything else yields `[]`.
pub fn listing_payload(mut envelope: Value) -> Value {
    match envelope.get_mut("data").map(Value::take) {
        Some(data @ Value::Array(_)) => data,
        _ => Value::Array(Vec::new()),
    }
}

/// The `data["<id>"]` record of a quotes envelope. Absent yields `{}`.
pub fn currency_payload(mut envelope: Value, id: CurrencyId) -> Value {
    envelope
        .get_mut("data")
        .and_then(|data| data.get_mut(id.to_string()))
        .map(Value::take)
        .filter(|record| !record.is_null())
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
}
