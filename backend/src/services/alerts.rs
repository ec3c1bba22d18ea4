//! Alert evaluation and the deduplicated delivery ledger
//!
//! Evaluation derives candidates from the metrics store views; the ledger
//! side guarantees each (station, hour, pollutant) triple reaches the
//! notification channel at most once, ever.

use std::collections::HashMap;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use shared::{
    evaluate_station, AlertCandidate, AlertDelivery, DynamicThresholds, EffectiveLimits,
    Pollutant, ThresholdPolicy,
};

use crate::error::{AppError, AppResult};
use crate::services::metrics::{latest_hourly_per_station, HourlyMetricRow, ThresholdRow};
use crate::Config;

/// Row shape shared by the pending query and the ledger.
#[derive(Debug, FromRow)]
struct DeliveryRow {
    station_id: i32,
    alert_timestamp: DateTime<Utc>,
    pollutant: String,
    value: f64,
    limit_value: f64,
    station_name: String,
    city: String,
}

impl TryFrom<DeliveryRow> for AlertDelivery {
    type Error = AppError;

    fn try_from(row: DeliveryRow) -> Result<Self, Self::Error> {
        let pollutant = Pollutant::from_code(&row.pollutant)
            .ok_or_else(|| AppError::InternalError(anyhow!("unknown pollutant code {}", row.pollutant)))?;
        Ok(AlertDelivery {
            station_id: row.station_id,
            alert_timestamp: row.alert_timestamp,
            pollutant,
            value: row.value,
            limit: row.limit_value,
            station_name: row.station_name,
            city: row.city,
        })
    }
}

/// Alert evaluation and delivery-ledger service
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
    city: String,
    policy: ThresholdPolicy,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            city: config.city.clone(),
            policy: config.alerts.threshold_policy,
        }
    }

    /// Evaluate every station's latest rollup. Stations without metrics are
    /// absent; stations with zero exceedances produce no candidate.
    pub async fn current_alerts(&self) -> AppResult<Vec<AlertCandidate>> {
        let metrics = latest_hourly_per_station(&self.db).await?;
        let thresholds = self.thresholds_by_station().await?;

        Ok(metrics
            .iter()
            .filter_map(|metric| {
                let limits =
                    EffectiveLimits::resolve(self.policy, thresholds.get(&metric.station_id));
                evaluate_station(metric, &limits, &self.city)
            })
            .collect())
    }

    /// Latest alert candidate for one station, or `None` when the station is
    /// currently clean or unknown.
    pub async fn station_alert(&self, station_id: i32) -> AppResult<Option<AlertCandidate>> {
        let row = sqlx::query_as::<_, HourlyMetricRow>(
            r#"
            SELECT station_id, station_name, measure_hour,
                   avg_so2, avg_no2, avg_o3, avg_co, avg_pm10, avg_pm25
            FROM marts.fct_air_quality_hourly
            WHERE station_id = $1
            ORDER BY measure_hour DESC
            LIMIT 1
            "#,
        )
        .bind(station_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let metric = row.into();

        let thresholds = self.station_thresholds(station_id).await?;
        let limits = EffectiveLimits::resolve(self.policy, thresholds.as_ref());

        Ok(evaluate_station(&metric, &limits, &self.city))
    }

    /// Per-pollutant alert triples not yet present in the delivery ledger.
    ///
    /// The set difference runs as one anti-join inside Postgres: candidate
    /// triples go in as parallel arrays and come back filtered. No per-row
    /// existence checks in application code, so concurrent pollers cannot
    /// race a read-then-write window.
    pub async fn pending_deliveries(&self) -> AppResult<Vec<AlertDelivery>> {
        let candidates = self.current_alerts().await?;
        let deliveries: Vec<AlertDelivery> =
            candidates.iter().flat_map(AlertCandidate::deliveries).collect();

        if deliveries.is_empty() {
            return Ok(Vec::new());
        }

        let (station_ids, timestamps, pollutants, values, limits, names, cities) =
            columns(&deliveries);

        let rows = sqlx::query_as::<_, DeliveryRow>(
            r#"
            SELECT c.station_id, c.alert_timestamp, c.pollutant,
                   c.value, c.limit_value, c.station_name, c.city
            FROM UNNEST(
                $1::int4[], $2::timestamptz[], $3::text[],
                $4::float8[], $5::float8[], $6::text[], $7::text[]
            ) AS c(station_id, alert_timestamp, pollutant,
                   value, limit_value, station_name, city)
            WHERE NOT EXISTS (
                SELECT 1
                FROM alerts_sent s
                WHERE s.station_id = c.station_id
                  AND s.alert_timestamp = c.alert_timestamp
                  AND s.pollutant = c.pollutant
            )
            "#,
        )
        .bind(&station_ids)
        .bind(&timestamps)
        .bind(&pollutants)
        .bind(&values)
        .bind(&limits)
        .bind(&names)
        .bind(&cities)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Append delivered triples to the permanent ledger.
    ///
    /// Re-registering an already-present triple is a silent no-op; the
    /// returned count covers only rows actually written.
    pub async fn record_delivered(&self, deliveries: &[AlertDelivery]) -> AppResult<u64> {
        if deliveries.is_empty() {
            return Ok(0);
        }

        let (station_ids, timestamps, pollutants, values, limits, names, cities) =
            columns(deliveries);

        let result = sqlx::query(
            r#"
            INSERT INTO alerts_sent (
                station_id, alert_timestamp, pollutant,
                value, limit_value, station_name, city
            )
            SELECT * FROM UNNEST(
                $1::int4[], $2::timestamptz[], $3::text[],
                $4::float8[], $5::float8[], $6::text[], $7::text[]
            )
            ON CONFLICT (station_id, alert_timestamp, pollutant) DO NOTHING
            "#,
        )
        .bind(&station_ids)
        .bind(&timestamps)
        .bind(&pollutants)
        .bind(&values)
        .bind(&limits)
        .bind(&names)
        .bind(&cities)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    async fn thresholds_by_station(&self) -> AppResult<HashMap<i32, DynamicThresholds>> {
        if self.policy == ThresholdPolicy::Fixed {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ThresholdRow>(
            r#"
            SELECT station_id, p75_so2, p75_no2, p75_o3, p75_co, p75_pm10, p75_pm25
            FROM marts.fct_station_thresholds
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.station_id, row.into()))
            .collect())
    }

    async fn station_thresholds(&self, station_id: i32) -> AppResult<Option<DynamicThresholds>> {
        if self.policy == ThresholdPolicy::Fixed {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, ThresholdRow>(
            r#"
            SELECT station_id, p75_so2, p75_no2, p75_o3, p75_co, p75_pm10, p75_pm25
            FROM marts.fct_station_thresholds
            WHERE station_id = $1
            "#,
        )
        .bind(station_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Into::into))
    }
}

/// Split deliveries into the parallel arrays the UNNEST statements bind.
#[allow(clippy::type_complexity)]
fn columns(
    deliveries: &[AlertDelivery],
) -> (
    Vec<i32>,
    Vec<DateTime<Utc>>,
    Vec<String>,
    Vec<f64>,
    Vec<f64>,
    Vec<String>,
    Vec<String>,
) {
    let mut station_ids = Vec::with_capacity(deliveries.len());
    let mut timestamps = Vec::with_capacity(deliveries.len());
    let mut pollutants = Vec::with_capacity(deliveries.len());
    let mut values = Vec::with_capacity(deliveries.len());
    let mut limits = Vec::with_capacity(deliveries.len());
    let mut names = Vec::with_capacity(deliveries.len());
    let mut cities = Vec::with_capacity(deliveries.len());

    for d in deliveries {
        station_ids.push(d.station_id);
        timestamps.push(d.alert_timestamp);
        pollutants.push(d.pollutant.code().to_string());
        values.push(d.value);
        limits.push(d.limit);
        names.push(d.station_name.clone());
        cities.push(d.city.clone());
    }

    (station_ids, timestamps, pollutants, values, limits, names, cities)
}
