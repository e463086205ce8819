//! Permissive field decoding for agent payloads and persisted snapshots.
//!
//! Agents return loosely shaped JSON. A field holding the wrong JSON type is
//! decoded as absent instead of failing the whole record.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an optional field, mapping any shape mismatch to `None`.
///
/// Use together with `#[serde(default)]` so missing keys also decode to `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], but a mismatch (including `null`) reads as `T::default()`
pub fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Decode a list, keeping only the entries that decode as `T`.
///
/// A value that is not a list reads as empty.
pub fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Calendar day from `YYYY-MM-DD` or any timestamp starting with one
pub fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = value
        .as_str()
        .ok_or_else(|| D::Error::custom(format!("expected a date string, got {}", value)))?;
    parse_day(text).ok_or_else(|| D::Error::custom(format!("unrecognized date: {}", text)))
}

fn parse_day(text: &str) -> Option<NaiveDate> {
    let day = text.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Decode a JSON object into `T`, falling back to `T::default()`.
///
/// Non-object values (arrays, strings, null) always produce the default, so a
/// record never gets populated positionally from an array.
pub fn from_object<T>(value: &Value) -> T
where
    T: DeserializeOwned + Default,
{
    if !value.is_object() {
        return T::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Non-empty string at `key`, if any.
pub fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn test_wrong_shape_becomes_none() {
        let sample: Sample = from_object(&json!({"name": 42, "tags": "not-a-list"}));
        assert!(sample.name.is_none());
        assert!(sample.tags.is_none());
    }

    #[test]
    fn test_well_formed_fields_survive() {
        let sample: Sample = from_object(&json!({"name": "banner", "tags": ["a", "b"]}));
        assert_eq!(sample.name.as_deref(), Some("banner"));
        assert_eq!(sample.tags, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_non_object_yields_default() {
        let sample: Sample = from_object(&json!(["banner", ["a"]]));
        assert!(sample.name.is_none());
        let sample: Sample = from_object(&Value::Null);
        assert!(sample.tags.is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "lenient_or_default")]
        title: String,
        #[serde(default, deserialize_with = "lenient_items")]
        items: Vec<u32>,
        #[serde(deserialize_with = "lenient_date")]
        date: NaiveDate,
    }

    #[test]
    fn test_record_helpers() {
        let record: Record = serde_json::from_value(json!({
            "title": null,
            "items": [1, "two", 3],
            "date": "2025-02-18T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.items, vec![1, 3]);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 2, 18).unwrap());

        let record: Record = serde_json::from_value(json!({"items": "x", "date": "2024-01-05"})).unwrap();
        assert!(record.items.is_empty());

        assert!(serde_json::from_value::<Record>(json!({"date": "last tuesday"})).is_err());
        assert!(serde_json::from_value::<Record>(json!({"date": 20250218})).is_err());
        assert!(serde_json::from_value::<Record>(json!({})).is_err());
    }

    #[test]
    fn test_non_empty_str() {
        let value = json!({"a": "x", "b": "", "c": 3});
        assert_eq!(non_empty_str(&value, "a"), Some("x"));
        assert_eq!(non_empty_str(&value, "b"), None);
        assert_eq!(non_empty_str(&value, "c"), None);
        assert_eq!(non_empty_str(&value, "missing"), None);
    }
}
