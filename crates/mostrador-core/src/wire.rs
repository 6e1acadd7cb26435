//! Tolerant deserializers for backend rows.
//!
//! Rows read back from the backend (pending sales, history, stock) may carry
//! numbers as strings, floats where integers are expected, or nulls. These
//! helpers read what they can and fall back to zero / `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::money::Money;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Amount column; unreadable values become zero.
pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(as_f64(&value).and_then(Money::from_decimal).unwrap_or_default())
}

/// Optional amount column; null and unreadable values become `None`.
pub fn amount_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(as_f64(&value).and_then(Money::from_decimal))
}

/// Integer count column; floats are rounded, unreadable values become zero.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        other => as_f64(other).map(|f| f.round() as i64).unwrap_or(0),
    })
}
