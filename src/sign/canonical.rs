use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::error::WechatError;

/// RFC 3986 unreserved characters stay literal; space becomes `%20`.
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Keys excluded from signing input regardless of value.
const RESERVED_KEYS: &[&str] = &["sign", "sign_type"];

/// Produce the canonical `key=value&key=value` string for a parameter set.
///
/// Entries whose key case-insensitively matches a reserved signing key and
/// entries whose value is empty after trimming are dropped; remaining keys
/// are sorted byte-wise ascending. The output is deterministic: two maps
/// with the same non-empty content canonicalize identically regardless of
/// insertion order.
///
/// # Errors
/// Returns [`WechatError::InvalidArgument`] if a value is a nested array
/// or object. Callers must pre-flatten nested values before signing.
pub fn canonicalize(params: &Map<String, Value>) -> Result<String, WechatError> {
    join_pairs(params, false)
}

/// Same as [`canonicalize`], but with each value percent-encoded.
///
/// Used when the canonical string is shipped as a query-style `package`
/// rather than consumed as raw signing input.
pub fn canonicalize_urlencoded(params: &Map<String, Value>) -> Result<String, WechatError> {
    join_pairs(params, true)
}

fn join_pairs(params: &Map<String, Value>, encode_values: bool) -> Result<String, WechatError> {
    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(params.len());

    for (key, value) in params {
        if RESERVED_KEYS.iter().any(|r| key.eq_ignore_ascii_case(r)) {
            continue;
        }
        let Some(rendered) = render_scalar(key, value)? else {
            continue;
        };
        pairs.push((key.as_str(), rendered));
    }

    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let joined = pairs
        .into_iter()
        .map(|(key, value)| {
            if encode_values {
                format!("{}={}", key, utf8_percent_encode(&value, VALUE_ENCODE_SET))
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    Ok(joined)
}

/// Render a scalar value to its signing text, or `None` if it is empty.
fn render_scalar(key: &str, value: &Value) -> Result<Option<String>, WechatError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(s.clone()))
            }
        }
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(WechatError::InvalidArgument(format!(
            "parameter '{}' is a nested value; flatten it before canonicalizing",
            key
        ))),
    }
}
