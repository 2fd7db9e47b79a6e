//! Response envelope normalization
//!
//! The API wraps collections in one of three shapes. They are checked in a
//! fixed order and the first match wins:
//!
//! 1. `{"data": [...]}`
//! 2. `[...]`
//! 3. `{"items": [...]}`
//!
//! Anything else normalizes to an empty list; an unrecognized envelope is
//! never an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Which envelope convention a response used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Data,
    Bare,
    Items,
    Unrecognized,
}

/// Detect the envelope shape of a raw response.
pub fn detect(raw: &Value) -> Envelope {
    if raw.get("data").is_some_and(Value::is_array) {
        Envelope::Data
    } else if raw.is_array() {
        Envelope::Bare
    } else if raw.get("items").is_some_and(Value::is_array) {
        Envelope::Items
    } else {
        Envelope::Unrecognized
    }
}

/// Extract the item array from a raw response.
pub fn normalize(raw: Value) -> Vec<Value> {
    match (detect(&raw), raw) {
        (Envelope::Bare, Value::Array(items)) => items,
        (Envelope::Data, Value::Object(mut map)) => take_array(&mut map, "data"),
        (Envelope::Items, Value::Object(mut map)) => take_array(&mut map, "items"),
        _ => Vec::new(),
    }
}

fn take_array(map: &mut serde_json::Map<String, Value>, key: &str) -> Vec<Value> {
    match map.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Deserialize each item into `T`, skipping items that do not fit the shape.
///
/// Records that fail to deserialize count as invalid and are dropped, the same
/// way serializers drop records with missing required fields.
pub fn decode_records<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_data_envelope() {
        let raw = json!({"data": [{"slug": "a"}, {"slug": "b"}], "meta": {"page": 1}});
        let items = normalize(raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["slug"], "a");
    }

    #[test]
    fn test_normalize_bare_array() {
        let items = normalize(json!([1, 2, 3]));
        assert_eq!(items, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_normalize_items_envelope() {
        let items = normalize(json!({"items": [{"slug": "x"}]}));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_data_takes_precedence_over_items() {
        let raw = json!({"data": [1], "items": [2, 3]});
        assert_eq!(detect(&raw), Envelope::Data);
        assert_eq!(normalize(raw), vec![json!(1)]);
    }

    #[test]
    fn test_non_array_data_falls_through_to_items() {
        let raw = json!({"data": {"nested": true}, "items": [7]});
        assert_eq!(detect(&raw), Envelope::Items);
        assert_eq!(normalize(raw), vec![json!(7)]);
    }

    #[test]
    fn test_unrecognized_shapes_are_empty() {
        assert!(normalize(json!({"results": [1]})).is_empty());
        assert!(normalize(json!(null)).is_empty());
        assert!(normalize(json!("text")).is_empty());
        assert!(normalize(json!({"data": null})).is_empty());
    }

    #[test]
    fn test_decode_records_skips_mismatched_items() {
        #[derive(serde::Deserialize)]
        struct Named {
            name: String,
        }

        let decoded: Vec<Named> =
            decode_records(vec![json!({"name": "ok"}), json!(42), json!({"name": 3})]);

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "ok");
    }
}
