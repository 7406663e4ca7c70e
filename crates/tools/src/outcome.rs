//! The boundary conversion: below this line errors are typed, above it they
//! are data. Every helper returns a JSON object with `success` + `message`.

use {
    gangway_backend::Error,
    serde_json::{Value, json},
};

pub(crate) fn failure(message: impl Into<String>) -> Value {
    json!({ "success": false, "message": message.into() })
}

/// Fold a backend error into a structured failure result.
pub(crate) fn absorb_error(err: &Error) -> Value {
    failure(err.to_string())
}

/// Required string parameter; the `Err` side is a ready-to-return failure
/// result, so call sites stay one-liners.
pub(crate) fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, Value> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| failure(format!("missing required parameter '{key}'")))
}

pub(crate) fn opt_str(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn u32_or(params: &Value, key: &str, default: u32) -> u32 {
    params
        .get(key)
        .and_then(Value::as_u64)
        .map_or(default, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

pub(crate) fn bool_or(params: &Value, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}
