//! Price endpoint response decoding.
//!
//! Expected body: `{"data": {"<id>": {"price": ..., ...}, ...}}`.
//! Only the `data` object matters; everything else in the body is ignored.

use crate::error::{FeedError, FeedResult};
use pricelog_core::{PriceRecord, PriceSnapshot, TokenId, TokenList};
use serde_json::Value;
use tracing::debug;

/// Decode a 200 response body into a snapshot.
///
/// - missing or `null` `data` yields an empty snapshot
/// - tokens mapped to `null` are treated as absent
/// - tokens outside the configured list are dropped
pub fn parse_price_response(tokens: &TokenList, body: &str) -> FeedResult<PriceSnapshot> {
    let value: Value = serde_json::from_str(body)?;

    let root = value
        .as_object()
        .ok_or_else(|| FeedError::Decode("response body is not a JSON object".to_string()))?;

    let data = match root.get("data") {
        None | Some(Value::Null) => return Ok(PriceSnapshot::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(FeedError::Decode(format!(
                "'data' is not an object: {}",
                type_name(other)
            )))
        }
    };

    let mut snapshot = PriceSnapshot::new();
    for (id, raw) in data {
        if raw.is_null() {
            debug!(token = %id, "Token has no price this cycle");
            continue;
        }
        if !tokens.contains(id) {
            debug!(token = %id, "Ignoring unrequested token in response");
            continue;
        }
        let token = TokenId::new(id.as_str())?;
        snapshot.insert(token, PriceRecord::from_raw(raw.clone()));
    }

    Ok(snapshot)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
