//! Inbound reading records accepted by the ingestion gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::Pollutant;

/// One pollutant measurement snapshot for one station, as submitted by an
/// ingestion poller.
///
/// The schema is strict: unknown fields reject the record outright, the
/// identifying fields are required, pollutant values are optional, and the
/// geo payloads are stored opaquely (validated only to be JSON objects).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "crate::validation::validate_pollutant_values"))]
pub struct IngestReading {
    pub station_id: i32,

    #[validate(length(min = 1))]
    pub fiware_id: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub address: String,

    #[validate(length(min = 1))]
    pub zone_type: String,

    #[validate(length(min = 1))]
    pub emission_type: String,

    #[validate(length(min = 1))]
    pub air_quality_label: String,

    pub capture_timestamp: DateTime<Utc>,

    #[serde(default)]
    pub parameters: Option<String>,

    #[serde(default)]
    pub measurements: Option<String>,

    #[serde(default)]
    pub so2: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
    #[serde(default)]
    pub co: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub pm25: Option<f64>,

    #[validate(custom = "crate::validation::validate_geo_object")]
    pub geo_shape: serde_json::Value,

    #[validate(custom = "crate::validation::validate_geo_object")]
    pub geo_point: serde_json::Value,
}

impl IngestReading {
    /// Reported value for one pollutant, if present in this record.
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::Co => self.co,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Pm25 => self.pm25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "station_id": 4,
            "fiware_id": "A04_PISTASILLA",
            "name": "Pista de Silla",
            "address": "Carrer de Sant Vicent",
            "zone_type": "urban",
            "emission_type": "traffic",
            "air_quality_label": "Buena",
            "capture_timestamp": "2026-08-01T10:00:00Z",
            "no2": 18.0,
            "pm25": 7.5,
            "geo_shape": {"type": "Feature"},
            "geo_point": {"lon": -0.3774, "lat": 39.4585}
        })
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let reading: IngestReading = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(reading.station_id, 4);
        assert_eq!(reading.value(Pollutant::No2), Some(18.0));
        assert_eq!(reading.value(Pollutant::So2), None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut json = sample_json();
        json["surprise"] = serde_json::json!(1);
        assert!(serde_json::from_value::<IngestReading>(json).is_err());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("fiware_id");
        assert!(serde_json::from_value::<IngestReading>(json).is_err());
    }
}
