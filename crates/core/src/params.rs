//! Lenient extraction of numeric tuning values from a `serde_json::Value` object.
//!
//! A missing key or a value of the wrong type yields the supplied default.
//! Range checks are left to the caller (see `PerceivableParams::new`).

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}
