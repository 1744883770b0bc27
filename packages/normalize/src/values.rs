//! Lenient coercion of loosely-typed JSON values.
//!
//! Upstream numbers sometimes arrive as strings and sometimes as `null`.
//! These helpers accept either and never fail.

use serde_json::{Map, Value};

/// Reads a finite number from a JSON number or numeric string.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Converts an accumulated count to `u64`, rounding and clamping negative
/// or non-finite values to `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_count(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 {
        n.round() as u64
    } else {
        0
    }
}

/// Reads a non-negative integer count, `0` when absent or not numeric.
#[must_use]
pub fn as_count(value: &Value) -> u64 {
    as_number(value).map_or(0, to_count)
}

/// Sums every numeric value of a JSON object, treating non-numeric values
/// as `0`.
#[must_use]
pub fn sum_values(map: Option<&Map<String, Value>>) -> u64 {
    map.map_or(0, |m| to_count(m.values().filter_map(as_number).sum()))
}

/// Reads a year from a JSON number or numeric string.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn as_year(value: &Value) -> Option<i32> {
    let n = as_number(value)?;
    (n.fract() == 0.0 && n > 0.0 && n < 10_000.0).then_some(n as i32)
}

/// Looks up a nested object by path, returning `None` if any step is
/// missing or not an object.
#[must_use]
pub fn object_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Map<String, Value>> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))?
        .as_object()
}

/// Reads the first present field of `names` as display text. Numbers and
/// booleans are stringified; `null` and missing fields give `""`.
#[must_use]
pub fn text_field(obj: &Map<String, Value>, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| match obj.get(*name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_default()
}

/// Reads the first present field of `names` as a flag.
#[must_use]
pub fn flag_field(obj: &Map<String, Value>, names: &[&str]) -> bool {
    names
        .iter()
        .find_map(|name| match obj.get(*name) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|n| n != 0.0)),
            Some(Value::String(s)) => Some(s.eq_ignore_ascii_case("true") || s == "1"),
            Some(_) => Some(false),
        })
        .unwrap_or(false)
}

/// Reads the first present numeric field of `names`, `0.0` when none is.
#[must_use]
pub fn number_field(obj: &Map<String, Value>, names: &[&str]) -> f64 {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(as_number))
        .unwrap_or(0.0)
}
