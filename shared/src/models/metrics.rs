//! Read contracts of the metrics store (hourly rollups and dynamic thresholds)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Pollutant;

/// One hourly rollup row per station: the average of each pollutant over
/// one hour, as published by `marts.fct_air_quality_hourly`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyMetric {
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

impl HourlyMetric {
    /// Averaged value for one pollutant, if the hour had any readings for it.
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::So2 => self.avg_so2,
            Pollutant::No2 => self.avg_no2,
            Pollutant::O3 => self.avg_o3,
            Pollutant::Co => self.avg_co,
            Pollutant::Pm10 => self.avg_pm10,
            Pollutant::Pm25 => self.avg_pm25,
        }
    }

    /// Sum of the non-null pollutant averages. Used as the pollution index
    /// when ranking stations.
    pub fn pollution_index(&self) -> f64 {
        Pollutant::ALL
            .into_iter()
            .filter_map(|p| self.value(p))
            .sum()
    }
}

/// Per-station dynamic thresholds: the 75th percentile of each pollutant
/// over a trailing window, as published by `marts.fct_station_thresholds`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DynamicThresholds {
    pub station_id: i32,
    pub p75_so2: Option<f64>,
    pub p75_no2: Option<f64>,
    pub p75_o3: Option<f64>,
    pub p75_co: Option<f64>,
    pub p75_pm10: Option<f64>,
    pub p75_pm25: Option<f64>,
}

impl DynamicThresholds {
    /// Percentile threshold for one pollutant, where enough data exists.
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::So2 => self.p75_so2,
            Pollutant::No2 => self.p75_no2,
            Pollutant::O3 => self.p75_o3,
            Pollutant::Co => self.p75_co,
            Pollutant::Pm10 => self.p75_pm10,
            Pollutant::Pm25 => self.p75_pm25,
        }
    }
}
