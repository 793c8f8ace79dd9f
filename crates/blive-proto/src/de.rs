//! Lenient field deserializers.
//!
//! The live-room server is inconsistent about whether numeric ids and
//! counters arrive as JSON numbers or strings, and sometimes sends `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string, number, bool or null and render it as a string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Accept an integer, a float, a numeric string or null (as zero).
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_i64(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {value}")))
}

pub(crate) fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Null => Some(0),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) if s.is_empty() => Some(0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "lenient_string")]
        s: String,
        #[serde(deserialize_with = "lenient_i64")]
        n: i64,
    }

    #[test]
    fn accepts_mixed_representations() {
        let p: Probe = serde_json::from_value(json!({"s": 12, "n": "34"})).unwrap();
        assert_eq!(p.s, "12");
        assert_eq!(p.n, 34);

        let p: Probe = serde_json::from_value(json!({"s": null, "n": 5.0})).unwrap();
        assert_eq!(p.s, "");
        assert_eq!(p.n, 5);
    }

    #[test]
    fn rejects_non_numeric_strings() {
        let res: Result<Probe, _> = serde_json::from_value(json!({"s": "", "n": "abc"}));
        assert!(res.is_err());
    }
}
