//! Validation utilities for inbound ingestion payloads

use validator::ValidationError;

use crate::models::IngestReading;
use crate::types::Pollutant;

/// Geo payloads are stored opaquely; the only requirement is that they are
/// well-formed JSON objects. Their internal shape is never inspected.
pub fn validate_geo_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ValidationError::new("geo_payload_must_be_object"))
    }
}

/// Reported pollutant values must be finite, non-negative numbers when
/// present. Absent values are fine (stations do not report every pollutant).
pub fn validate_pollutant_values(reading: &IngestReading) -> Result<(), ValidationError> {
    for pollutant in Pollutant::ALL {
        if let Some(value) = reading.value(pollutant) {
            if !value.is_finite() || value < 0.0 {
                let mut err = ValidationError::new("pollutant_value_out_of_range");
                err.add_param("pollutant".into(), &pollutant.code());
                return Err(err);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use validator::Validate;

    fn reading() -> IngestReading {
        IngestReading {
            station_id: 4,
            fiware_id: "A04_PISTASILLA".to_string(),
            name: "Pista de Silla".to_string(),
            address: "Carrer de Sant Vicent".to_string(),
            zone_type: "urban".to_string(),
            emission_type: "traffic".to_string(),
            air_quality_label: "Buena".to_string(),
            capture_timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
            parameters: None,
            measurements: None,
            so2: None,
            no2: Some(18.0),
            o3: None,
            co: None,
            pm10: None,
            pm25: Some(7.5),
            geo_shape: serde_json::json!({"type": "Feature"}),
            geo_point: serde_json::json!({"lon": -0.3774, "lat": 39.4585}),
        }
    }

    #[test]
    fn test_valid_reading_passes() {
        assert!(reading().validate().is_ok());
    }

    #[test]
    fn test_geo_payload_must_be_object() {
        let mut r = reading();
        r.geo_point = serde_json::json!([1.0, 2.0]);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_empty_identifier_fails() {
        let mut r = reading();
        r.fiware_id = String::new();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_negative_pollutant_value_fails() {
        let mut r = reading();
        r.no2 = Some(-3.0);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_nan_pollutant_value_fails() {
        let mut r = reading();
        r.pm25 = Some(f64::NAN);
        assert!(r.validate().is_err());
    }
}
