//! Valencia open-data feed: fetch and normalization
//!
//! The opendatasoft records API wraps station snapshots in a `results`
//! envelope with Spanish field names; each record is reshaped into the
//! gateway's ingestion schema. Records that fail to parse are skipped
//! individually so one malformed station never sinks the batch.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use shared::IngestReading;

/// Envelope of the opendatasoft records API.
#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// One station snapshot as published by the Valencia feed.
#[derive(Debug, Deserialize)]
struct ValenciaRecord {
    objectid: i32,
    fiwareid: String,
    nombre: String,
    direccion: String,
    tipozona: String,
    tipoemisio: String,
    calidad_am: String,
    fecha_carg: DateTime<Utc>,
    #[serde(default)]
    parametros: Option<String>,
    #[serde(default)]
    mediciones: Option<String>,
    #[serde(default)]
    so2: Option<f64>,
    #[serde(default)]
    no2: Option<f64>,
    #[serde(default)]
    o3: Option<f64>,
    #[serde(default)]
    co: Option<f64>,
    #[serde(default)]
    pm10: Option<f64>,
    #[serde(default)]
    pm25: Option<f64>,
    geo_shape: serde_json::Value,
    geo_point_2d: serde_json::Value,
}

impl From<ValenciaRecord> for IngestReading {
    fn from(r: ValenciaRecord) -> Self {
        IngestReading {
            station_id: r.objectid,
            fiware_id: r.fiwareid,
            name: r.nombre,
            address: r.direccion,
            zone_type: r.tipozona,
            emission_type: r.tipoemisio,
            air_quality_label: r.calidad_am,
            capture_timestamp: r.fecha_carg,
            parameters: r.parametros,
            measurements: r.mediciones,
            so2: r.so2,
            no2: r.no2,
            o3: r.o3,
            co: r.co,
            pm10: r.pm10,
            pm25: r.pm25,
            geo_shape: r.geo_shape,
            geo_point: r.geo_point_2d,
        }
    }
}

/// Fetch the current station snapshots and normalize them into the gateway
/// record shape.
pub async fn fetch_readings(client: &reqwest::Client, url: &str) -> Result<Vec<IngestReading>> {
    let envelope: RecordsEnvelope = client
        .get(url)
        .send()
        .await
        .context("Valencia API request failed")?
        .error_for_status()
        .context("Valencia API returned an error status")?
        .json()
        .await
        .context("Valencia API response was not valid JSON")?;

    let mut readings = Vec::with_capacity(envelope.results.len());
    for (i, item) in envelope.results.into_iter().enumerate() {
        match serde_json::from_value::<ValenciaRecord>(item) {
            Ok(record) => readings.push(record.into()),
            Err(e) => {
                tracing::debug!("Skipping unparseable record {}: {}", i, e);
            }
        }
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_normalization() {
        let json = serde_json::json!({
            "objectid": 4,
            "fiwareid": "A04_PISTASILLA",
            "nombre": "Pista de Silla",
            "direccion": "Carrer de Sant Vicent",
            "tipozona": "urbana",
            "tipoemisio": "trafico",
            "calidad_am": "Buena",
            "fecha_carg": "2026-08-01T10:05:00+02:00",
            "no2": 18.0,
            "pm25": 7.5,
            "geo_shape": {"type": "Feature"},
            "geo_point_2d": {"lon": -0.3774, "lat": 39.4585}
        });

        let record: ValenciaRecord = serde_json::from_value(json).unwrap();
        let reading: IngestReading = record.into();

        assert_eq!(reading.station_id, 4);
        assert_eq!(reading.name, "Pista de Silla");
        assert_eq!(reading.no2, Some(18.0));
        assert_eq!(reading.so2, None);
        // +02:00 local capture time normalizes to UTC
        assert_eq!(
            reading.capture_timestamp.to_rfc3339(),
            "2026-08-01T08:05:00+00:00"
        );
        assert!(reading.geo_point.is_object());
    }
}
