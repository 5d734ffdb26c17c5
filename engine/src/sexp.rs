//! Property-list helpers over `lexpr` values.
//!
//! Config files and replay frames are plists such as
//! `(:pinch-threshold 0.08 :mirror-x t)`.  Keys may come back from the
//! parser either as `Value::Keyword("key")` or `Value::Symbol(":key")`;
//! both forms are accepted.

use lexpr::Value;

/// Whether `v` is the keyword `key` (without the leading colon).
fn is_key(v: &Value, key: &str) -> bool {
    match v {
        Value::Keyword(k) => k.as_ref() == key,
        Value::Symbol(s) => s.strip_prefix(':') == Some(key),
        _ => false,
    }
}

/// Look up `key` in a plist, stepping over key/value pairs.
pub fn plist_get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = value;
    while let Value::Cons(pair) = current {
        let Value::Cons(next) = pair.cdr() else {
            return None;
        };
        if is_key(pair.car(), key) {
            return Some(next.car());
        }
        current = next.cdr();
    }
    None
}

/// Elements of a proper list.  `()` and `nil` are empty lists.
pub fn list_items(value: &Value) -> Vec<&Value> {
    let mut items = Vec::new();
    let mut current = value;
    while let Value::Cons(pair) = current {
        items.push(pair.car());
        current = pair.cdr();
    }
    items
}

/// Numeric value as f64.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Symbol, keyword or string content, without a leading colon.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_string()),
        Value::Keyword(k) => Some(k.to_string()),
        Value::Symbol(s) => Some(s.strip_prefix(':').unwrap_or(&**s).to_string()),
        _ => None,
    }
}

/// Elisp-style truthiness: `nil`, `()` and `#f` are false.
pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Nil | Value::Null => false,
        Value::Symbol(s) => s.as_ref() != "nil",
        _ => true,
    }
}

pub fn get_string(value: &Value, key: &str) -> Option<String> {
    plist_get(value, key).and_then(as_text)
}

pub fn get_bool(value: &Value, key: &str) -> Option<bool> {
    plist_get(value, key).map(as_bool)
}

// ── Tests ──────────────────────────────────────────────────
