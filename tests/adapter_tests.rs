//! Adapter tests that require no running backend: configuration, the codec
//! round-trip laws, id derivation, and the request-body builders as seen
//! through the public API.

use chrono::NaiveDate;
use elastic_dao::{document, DaoConfig, DocumentId, ElasticDao, Value};
use serde_json::json;

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = DaoConfig::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 9200);
    assert_eq!(config.scheme(), "http");
    assert_eq!(config.timeout_secs, 60);
    assert_eq!(config.max_retries, 10);
    assert!(config.retry_on_timeout);
    assert!(!config.disable_certificate_validation);
}

#[test]
fn test_config_serialization() {
    let config = DaoConfig::new("es1.internal", 9243)
        .with_auth("elastic", "changeme")
        .with_tls();

    let encoded = serde_json::to_string(&config).unwrap();
    let decoded: DaoConfig = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.host, "es1.internal");
    assert_eq!(decoded.port, 9243);
    assert_eq!(decoded.scheme(), "https");
    assert_eq!(decoded.url(), "https://es1.internal:9243");
}

#[test]
fn test_dao_creation_does_not_connect() {
    // Building the facade never touches the network.
    let dao = ElasticDao::new(DaoConfig::new("nonexistent.invalid", 1));
    assert!(!dao.is_connected());
    assert_eq!(dao.config().host, "nonexistent.invalid");
}

// ============================================================================
// Codec laws
// ============================================================================

#[test]
fn test_decoder_is_identity_on_non_date_strings() {
    for s in ["서울특별시 관악구", "홍승걸", "plain text", "1234-567-890x"] {
        assert_eq!(
            elastic_dao::codec::decode(&json!(s)),
            Value::String(s.to_string())
        );
    }
}

#[test]
fn test_date_leaves_round_trip() {
    let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let dt = date.and_hms_opt(9, 30, 0).unwrap();

    for value in [Value::Date(date), Value::DateTime(dt)] {
        let encoded = elastic_dao::codec::encode(&value);
        assert!(encoded.is_string());
        assert_eq!(elastic_dao::codec::decode(&encoded), value);
    }
}

#[test]
fn test_document_round_trip_field_for_field() {
    let doc = document([
        ("no", Value::from(7)),
        ("name", Value::from("홍승걸")),
        ("address", Value::from("서울특별시 관악구")),
        (
            "dateOfEntry",
            Value::from(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()),
        ),
    ]);

    let wire = elastic_dao::codec::encode_document(&doc);
    assert_eq!(wire["dateOfEntry"], json!("2021-06-01"));

    let back = elastic_dao::codec::decode_document(&wire).unwrap();
    assert_eq!(back, doc);
    assert!(matches!(back["dateOfEntry"], Value::Date(_)));
}

// ============================================================================
// Id derivation
// ============================================================================

#[test]
fn test_id_determinism_and_shape() {
    let a = DocumentId::derive("order-2021-000123");
    let b = DocumentId::derive("order-2021-000123");
    assert_eq!(a, b);
    assert_eq!(a.as_bytes().len(), 12);
    assert_eq!(a.to_string().len(), 24);
}

#[test]
fn test_numeric_and_string_forms_agree() {
    assert_eq!(DocumentId::derive(42), DocumentId::derive("42"));
    assert_ne!(DocumentId::derive(42), DocumentId::derive(43));
}
