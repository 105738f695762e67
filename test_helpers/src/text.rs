//! Text helpers for behavioural step arguments.

use serde_json::Value;

/// Strips one layer of matching single or double quotes from a value.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
        })
        .unwrap_or(trimmed)
}

/// Parses a step argument as JSON, falling back to a JSON string.
///
/// `42` and `{"a": 1}` parse as JSON; `'Jimmy'` and `Jimmy` both become the
/// string `"Jimmy"`.
#[must_use]
pub fn json_arg(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('\'') {
        return Value::String(unquote(trimmed).to_owned());
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(unquote(trimmed).to_owned()))
}
