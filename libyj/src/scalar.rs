//! Scalar normalization: trimming, quote removal, and type coercion.

use crate::value::Value;
use num_bigint::BigInt;

/// Normalize raw scalar text into a value.
///
/// Booleans are recognized before quotes are removed, so `"yes"` stays a
/// string while `'42'` still becomes an integer. Only unsigned runs of
/// ASCII digits are integers; `-1` and `1.5` remain strings.
pub fn strip(text: &str) -> Value {
    let s = text.trim();

    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" => return Value::Bool(true),
        "false" | "no" => return Value::Bool(false),
        _ => {}
    }

    let s = unquote(s);

    if is_integer(s) {
        if let Some(n) = BigInt::parse_bytes(s.as_bytes(), 10) {
            return Value::Integer(n);
        }
    }

    Value::String(s.to_string())
}

/// Normalize raw key text into a mapping key.
///
/// Keys are coerced like values and then rendered back to text, so
/// `yes` becomes `"true"` and `007` becomes `"7"`.
pub fn key(text: &str) -> String {
    match strip(text) {
        Value::Bool(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::String(s) => s,
        // strip only produces scalars
        other => format!("{:?}", other),
    }
}

/// Remove one matching pair of outer quotes.
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
