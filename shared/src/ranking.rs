//! Cleanest-station ranking

use serde::{Deserialize, Serialize};

use crate::models::HourlyMetric;
use crate::types::Pollutant;

/// One entry of the cleanest-station ranking. Rank 1 is the cleanest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationRanking {
    pub rank: u32,
    pub station_id: i32,
    pub station_name: String,
    pub pollution_index: f64,
}

/// Rank stations by their latest hourly rollup, ascending by pollution
/// index (sum of non-null pollutant averages).
///
/// A station exceeding any fixed reference limit is excluded from the
/// ranking entirely, regardless of its index.
pub fn rank_stations(metrics: &[HourlyMetric]) -> Vec<StationRanking> {
    let mut eligible: Vec<&HourlyMetric> = metrics
        .iter()
        .filter(|m| !exceeds_any_fixed_limit(m))
        .collect();

    eligible.sort_by(|a, b| a.pollution_index().total_cmp(&b.pollution_index()));

    eligible
        .into_iter()
        .enumerate()
        .map(|(i, m)| StationRanking {
            rank: i as u32 + 1,
            station_id: m.station_id,
            station_name: m.station_name.clone(),
            pollution_index: m.pollution_index(),
        })
        .collect()
}

fn exceeds_any_fixed_limit(metric: &HourlyMetric) -> bool {
    Pollutant::ALL.into_iter().any(|p| {
        match (metric.value(p), p.fixed_limit()) {
            (Some(value), Some(limit)) => value > limit,
            _ => false,
        }
    })
}
