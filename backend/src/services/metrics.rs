//! Reads over the metrics store views

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use shared::{DynamicThresholds, HourlyMetric};

use crate::error::AppResult;

/// Row shape of marts.fct_air_quality_hourly.
#[derive(Debug, FromRow)]
pub(crate) struct HourlyMetricRow {
    pub station_id: i32,
    pub station_name: String,
    pub measure_hour: DateTime<Utc>,
    pub avg_so2: Option<f64>,
    pub avg_no2: Option<f64>,
    pub avg_o3: Option<f64>,
    pub avg_co: Option<f64>,
    pub avg_pm10: Option<f64>,
    pub avg_pm25: Option<f64>,
}

impl From<HourlyMetricRow> for HourlyMetric {
    fn from(row: HourlyMetricRow) -> Self {
        HourlyMetric {
            station_id: row.station_id,
            station_name: row.station_name,
            measure_hour: row.measure_hour,
            avg_so2: row.avg_so2,
            avg_no2: row.avg_no2,
            avg_o3: row.avg_o3,
            avg_co: row.avg_co,
            avg_pm10: row.avg_pm10,
            avg_pm25: row.avg_pm25,
        }
    }
}

/// Row shape of marts.fct_station_thresholds.
#[derive(Debug, FromRow)]
pub(crate) struct ThresholdRow {
    pub station_id: i32,
    pub p75_so2: Option<f64>,
    pub p75_no2: Option<f64>,
    pub p75_o3: Option<f64>,
    pub p75_co: Option<f64>,
    pub p75_pm10: Option<f64>,
    pub p75_pm25: Option<f64>,
}

impl From<ThresholdRow> for DynamicThresholds {
    fn from(row: ThresholdRow) -> Self {
        DynamicThresholds {
            station_id: row.station_id,
            p75_so2: row.p75_so2,
            p75_no2: row.p75_no2,
            p75_o3: row.p75_o3,
            p75_co: row.p75_co,
            p75_pm10: row.p75_pm10,
            p75_pm25: row.p75_pm25,
        }
    }
}

const HOURLY_COLUMNS: &str = "station_id, station_name, measure_hour, \
     avg_so2, avg_no2, avg_o3, avg_co, avg_pm10, avg_pm25";

/// The most recent rollup row of every station.
pub(crate) async fn latest_hourly_per_station(db: &PgPool) -> AppResult<Vec<HourlyMetric>> {
    let sql = format!(
        r#"
        SELECT DISTINCT ON (station_id) {HOURLY_COLUMNS}
        FROM marts.fct_air_quality_hourly
        ORDER BY station_id, measure_hour DESC
        "#
    );
    let rows = sqlx::query_as::<_, HourlyMetricRow>(&sql)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Metrics store read service
#[derive(Clone)]
pub struct MetricsService {
    db: PgPool,
}

impl MetricsService {
    /// Create a new MetricsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Recent hourly rollups across all stations, newest first.
    pub async fn hourly(&self, limit: i64) -> AppResult<Vec<HourlyMetric>> {
        let sql = format!(
            r#"
            SELECT {HOURLY_COLUMNS}
            FROM marts.fct_air_quality_hourly
            ORDER BY measure_hour DESC, station_id
            LIMIT $1
            "#
        );
        let rows = sqlx::query_as::<_, HourlyMetricRow>(&sql)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
