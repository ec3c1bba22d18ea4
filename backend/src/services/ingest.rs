//! Idempotent ingestion of raw station readings
//!
//! Each batch is written as one multi-row INSERT; the unique key on
//! (station_id, capture_timestamp) absorbs repeated deliveries from the
//! pollers, so a replayed batch changes nothing.

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use shared::IngestReading;

use crate::error::{AppError, AppResult};

/// Rows per batch. 18 bind parameters per row must stay well under the
/// Postgres limit of 65535 parameters per statement.
pub const MAX_BATCH_ROWS: usize = 1000;

/// Outcome of one gateway call.
#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    /// Records submitted by the caller.
    pub received: usize,
    /// Records actually stored; the rest were already present.
    pub inserted: u64,
}

/// Ingestion gateway service
#[derive(Clone)]
pub struct IngestService {
    db: PgPool,
}

impl IngestService {
    /// Create a new IngestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Persist a validated batch of readings with at-most-once effect per
    /// (station_id, capture_timestamp).
    ///
    /// Conflicting rows are skipped silently, never overwritten. Storage
    /// failure leaves no partial commit visible to the caller, who retries
    /// the whole batch.
    pub async fn ingest_batch(&self, readings: &[IngestReading]) -> AppResult<IngestOutcome> {
        if readings.is_empty() {
            return Ok(IngestOutcome {
                received: 0,
                inserted: 0,
            });
        }
        if readings.len() > MAX_BATCH_ROWS {
            return Err(AppError::ValidationError(format!(
                "Batch of {} records exceeds the limit of {}",
                readings.len(),
                MAX_BATCH_ROWS
            )));
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            INSERT INTO raw.station_readings (
                station_id, fiware_id, station_name, address,
                zone_type, emission_type, air_quality_label,
                capture_timestamp, parameters, measurements,
                so2, no2, o3, co, pm10, pm25,
                geo_shape, geo_point
            ) "#,
        );

        builder.push_values(readings, |mut row, r| {
            row.push_bind(r.station_id)
                .push_bind(&r.fiware_id)
                .push_bind(&r.name)
                .push_bind(&r.address)
                .push_bind(&r.zone_type)
                .push_bind(&r.emission_type)
                .push_bind(&r.air_quality_label)
                .push_bind(r.capture_timestamp)
                .push_bind(&r.parameters)
                .push_bind(&r.measurements)
                .push_bind(r.so2)
                .push_bind(r.no2)
                .push_bind(r.o3)
                .push_bind(r.co)
                .push_bind(r.pm10)
                .push_bind(r.pm25)
                .push_bind(&r.geo_shape)
                .push_bind(&r.geo_point);
        });

        builder.push(" ON CONFLICT (station_id, capture_timestamp) DO NOTHING");

        let result = builder.build().execute(&self.db).await?;

        Ok(IngestOutcome {
            received: readings.len(),
            inserted: result.rows_affected(),
        })
    }
}
