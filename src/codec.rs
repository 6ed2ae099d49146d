//! Encoder/decoder pair between [`Document`] trees and wire JSON.
//!
//! Both directions are pure recursive transforms over scalar leaves: keys and
//! container structure are preserved, only leaf values are rewritten. The
//! encoder serializes date and datetime leaves to ISO-8601 strings before a
//! document is sent; the decoder revives ISO-8601-parseable strings into
//! typed values after retrieval, leaving every other string untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde_json::{json, Map};

use crate::document::{Document, Value};

/// Encodes a single field value into wire JSON.
pub fn encode(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Integer(n) => json!(n),
        Value::Float(f) => json!(f),
        Value::String(s) => json!(s),
        Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => json!(format_naive_datetime(dt)),
        Value::DateTimeTz(dt) => json!(dt.to_rfc3339()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(encode).collect()),
        Value::Object(doc) => serde_json::Value::Object(encode_fields(doc)),
    }
}

/// Encodes a document into a wire JSON object.
pub fn encode_document(doc: &Document) -> serde_json::Value {
    serde_json::Value::Object(encode_fields(doc))
}

fn encode_fields(doc: &Document) -> Map<String, serde_json::Value> {
    doc.iter().map(|(k, v)| (k.clone(), encode(v))).collect()
}

fn format_naive_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

/// Decodes a single wire JSON value into a field value.
///
/// Strings are tried as a date first, then a naive datetime, then an
/// offset datetime. The order matters: a date-only string must not come back
/// as a datetime with a defaulted midnight time. Strings that parse as none
/// of the three pass through unchanged.
pub fn decode(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => decode_str(s),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(decode).collect()),
        serde_json::Value::Object(map) => Value::Object(decode_fields(map)),
    }
}

/// Decodes a wire JSON object into a document. Returns `None` when the value
/// is not an object.
pub fn decode_document(value: &serde_json::Value) -> Option<Document> {
    value.as_object().map(decode_fields)
}

fn decode_fields(map: &Map<String, serde_json::Value>) -> Document {
    map.iter().map(|(k, v)| (k.clone(), decode(v))).collect()
}

fn decode_str(s: &str) -> Value {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Value::Date(date);
    }
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Value::DateTime(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Value::DateTimeTz(dt);
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document;

    #[test]
    fn test_non_date_strings_pass_through() {
        for s in ["서울특별시 중구", "hello", "", "2021", "not-a-date", "12:30:00"] {
            assert_eq!(decode(&json!(s)), Value::String(s.to_string()));
        }
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2021, 4, 1).unwrap();
        let encoded = encode(&Value::Date(date));
        assert_eq!(encoded, json!("2021-04-01"));
        assert_eq!(decode(&encoded), Value::Date(date));
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2021, 5, 20)
            .unwrap()
            .and_hms_opt(13, 45, 7)
            .unwrap();
        let encoded = encode(&Value::DateTime(dt));
        assert_eq!(encoded, json!("2021-05-20T13:45:07"));
        assert_eq!(decode(&encoded), Value::DateTime(dt));
    }

    #[test]
    fn test_datetime_with_offset_round_trip() {
        let dt = DateTime::parse_from_rfc3339("2021-06-01T09:00:00+09:00").unwrap();
        let encoded = encode(&Value::DateTimeTz(dt));
        assert_eq!(decode(&encoded), Value::DateTimeTz(dt));
    }

    #[test]
    fn test_date_parse_attempted_before_datetime() {
        // A date-only string must never come back with a defaulted time.
        let decoded = decode(&json!("2021-06-01"));
        assert!(matches!(decoded, Value::Date(_)));
    }

    #[test]
    fn test_subsecond_precision_survives() {
        let dt = NaiveDate::from_ymd_opt(2021, 5, 20)
            .unwrap()
            .and_hms_milli_opt(13, 45, 7, 250)
            .unwrap();
        let encoded = encode(&Value::DateTime(dt));
        assert_eq!(decode(&encoded), Value::DateTime(dt));
    }

    #[test]
    fn test_nested_structure_preserved() {
        let doc = document([
            ("no", Value::from(5)),
            ("name", Value::from("최준호")),
            (
                "entry",
                Value::Object(document([(
                    "created",
                    Value::from(NaiveDate::from_ymd_opt(2021, 5, 20).unwrap()),
                )])),
            ),
            (
                "tags",
                Value::from(vec![Value::from("a"), Value::from("2021-04-01")]),
            ),
        ]);

        let encoded = encode_document(&doc);
        assert_eq!(encoded["entry"]["created"], json!("2021-05-20"));

        let decoded = decode_document(&encoded).unwrap();
        // Date strings inside arrays are revived too.
        match &decoded["tags"] {
            Value::Array(items) => {
                assert_eq!(items[0], Value::from("a"));
                assert!(matches!(items[1], Value::Date(_)));
            }
            other => panic!("expected array, got {other:?}"),
        }
        assert_eq!(decoded["name"], Value::from("최준호"));
    }

    #[test]
    fn test_decode_document_rejects_non_objects() {
        assert!(decode_document(&json!([1, 2])).is_none());
        assert!(decode_document(&json!("text")).is_none());
    }

    #[test]
    fn test_offset_is_preserved_not_normalized() {
        let dt = DateTime::parse_from_rfc3339("2021-06-01T09:00:00+09:00").unwrap();
        let encoded = encode(&Value::DateTimeTz(dt));
        let s = encoded.as_str().unwrap();
        assert!(s.ends_with("+09:00"), "offset lost: {s}");
    }
}
