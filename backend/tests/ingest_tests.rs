//! Ingestion payload schema tests
//!
//! The gateway fails closed: unknown fields, missing identifiers, and
//! malformed geo payloads are all rejected before storage is touched.

use proptest::prelude::*;
use validator::Validate;

use shared::IngestReading;

fn record_json() -> serde_json::Value {
    serde_json::json!({
        "station_id": 4,
        "fiware_id": "A04_PISTASILLA",
        "name": "Pista de Silla",
        "address": "Carrer de Sant Vicent",
        "zone_type": "urbana",
        "emission_type": "trafico",
        "air_quality_label": "Buena",
        "capture_timestamp": "2026-08-01T10:00:00Z",
        "so2": 3.0,
        "no2": 18.0,
        "o3": 41.0,
        "co": 0.2,
        "pm10": 12.0,
        "pm25": 7.5,
        "geo_shape": {"type": "Feature", "geometry": {}, "properties": {}},
        "geo_point": {"lon": -0.3774, "lat": 39.4585}
    })
}

fn parse(json: serde_json::Value) -> Result<IngestReading, serde_json::Error> {
    serde_json::from_value(json)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_full_record_parses_and_validates() {
    let reading = parse(record_json()).unwrap();
    assert!(reading.validate().is_ok());
}

#[test]
fn test_unknown_field_fails_closed() {
    let mut json = record_json();
    json["battery_level"] = serde_json::json!(0.97);
    assert!(parse(json).is_err());
}

#[test]
fn test_each_identifying_field_is_required() {
    for field in [
        "station_id",
        "fiware_id",
        "name",
        "address",
        "zone_type",
        "emission_type",
        "capture_timestamp",
        "geo_shape",
        "geo_point",
    ] {
        let mut json = record_json();
        json.as_object_mut().unwrap().remove(field);
        assert!(parse(json).is_err(), "missing {} should fail", field);
    }
}

#[test]
fn test_pollutant_fields_are_optional() {
    let mut json = record_json();
    for field in ["so2", "no2", "o3", "co", "pm10", "pm25"] {
        json.as_object_mut().unwrap().remove(field);
    }
    let reading = parse(json).unwrap();
    assert!(reading.validate().is_ok());
    assert_eq!(reading.no2, None);
}

#[test]
fn test_geo_payload_shape_is_not_inspected() {
    // Any object passes, whatever its keys
    let mut json = record_json();
    json["geo_shape"] = serde_json::json!({"whatever": [1, 2, 3]});
    let reading = parse(json).unwrap();
    assert!(reading.validate().is_ok());
}

#[test]
fn test_non_object_geo_payload_fails_validation() {
    let mut json = record_json();
    json["geo_shape"] = serde_json::json!("POINT(-0.37 39.45)");
    let reading = parse(json).unwrap();
    assert!(reading.validate().is_err());
}

#[test]
fn test_malformed_timestamp_is_rejected() {
    let mut json = record_json();
    json["capture_timestamp"] = serde_json::json!("yesterday at noon");
    assert!(parse(json).is_err());
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Finite non-negative pollutant values always validate.
    #[test]
    fn prop_non_negative_values_validate(value in 0.0f64..10_000.0) {
        let mut json = record_json();
        json["no2"] = serde_json::json!(value);
        let reading = parse(json).unwrap();
        prop_assert!(reading.validate().is_ok());
    }

    /// Negative pollutant values never validate.
    #[test]
    fn prop_negative_values_fail(value in -10_000.0f64..-0.0001) {
        let mut json = record_json();
        json["pm10"] = serde_json::json!(value);
        let reading = parse(json).unwrap();
        prop_assert!(reading.validate().is_err());
    }
}
