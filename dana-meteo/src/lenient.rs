//! Lenient field decoding for loosely typed GeoJSON/JSON properties.
//!
//! Source files mix numbers, numeric strings and nulls for the same field.
//! Everything that is not a usable number reads as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value to a number: numbers as-is, trimmed numeric strings
/// parsed. Empty strings, booleans, null and NaN read as `None`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| !v.is_nan())
}

/// Coerce a JSON value to text: strings as-is (empty reads as absent),
/// numbers formatted.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_f64))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_text))
}

/// A sequence whose items may individually be missing (`null`, strings, ...).
pub fn number_seq<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(coerce_f64)
        .collect())
}

/// `null` where an object is expected reads as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
