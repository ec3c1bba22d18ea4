//! Alert evaluation: effective limits, severity policy, candidate derivation

use serde::{Deserialize, Serialize};

use crate::models::{AlertCandidate, DynamicThresholds, HourlyMetric, PollutantLevel};
use crate::types::Pollutant;

/// Which limit source the evaluator compares against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// Fixed WHO-style reference constants.
    #[default]
    Fixed,
    /// Per-station percentile thresholds from the metrics store, falling
    /// back to the fixed constant where the percentile is null.
    Dynamic,
}

/// Resolved per-pollutant limits for one station.
///
/// Both policies produce this same shape, so swapping between them never
/// changes the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveLimits {
    limits: [Option<f64>; 6],
}

impl EffectiveLimits {
    /// Limits from the fixed reference constants alone.
    pub fn fixed() -> Self {
        let mut limits = [None; 6];
        for p in Pollutant::ALL {
            limits[p.idx()] = p.fixed_limit();
        }
        Self { limits }
    }

    /// Limits from a station's dynamic-threshold row, with the fixed
    /// constant as fallback for pollutants lacking percentile data.
    pub fn from_thresholds(thresholds: &DynamicThresholds) -> Self {
        let mut limits = [None; 6];
        for p in Pollutant::ALL {
            limits[p.idx()] = thresholds.value(p).or_else(|| p.fixed_limit());
        }
        Self { limits }
    }

    /// Resolve limits for one station under the configured policy.
    pub fn resolve(policy: ThresholdPolicy, thresholds: Option<&DynamicThresholds>) -> Self {
        match (policy, thresholds) {
            (ThresholdPolicy::Dynamic, Some(t)) => Self::from_thresholds(t),
            _ => Self::fixed(),
        }
    }

    /// Effective limit for one pollutant, if any applies.
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.limits[pollutant.idx()]
    }
}

/// One row of the severity policy. Rows are scanned top-down; the first
/// matching row decides the alert's level and wording.
#[derive(Debug, Clone, Copy)]
pub struct SeverityRule {
    pub min_exceedances: usize,
    pub level: u8,
    pub description: &'static str,
    pub recommendation: &'static str,
}

/// Ordered severity policy, most severe first.
pub const SEVERITY_POLICY: [SeverityRule; 3] = [
    SeverityRule {
        min_exceedances: 3,
        level: 3,
        description: "Very poor air quality",
        recommendation: "Avoid outdoor activity; sensitive groups should stay indoors",
    },
    SeverityRule {
        min_exceedances: 2,
        level: 2,
        description: "Poor air quality",
        recommendation: "Limit prolonged or heavy exertion outdoors",
    },
    SeverityRule {
        min_exceedances: 1,
        level: 1,
        description: "Moderate air quality episode",
        recommendation: "Sensitive groups should reduce prolonged exertion outdoors",
    },
];

/// Pick the severity rule for a given exceedance count, or `None` when the
/// count does not qualify as an alert.
pub fn classify_severity(exceedances: usize) -> Option<&'static SeverityRule> {
    SEVERITY_POLICY
        .iter()
        .find(|rule| exceedances >= rule.min_exceedances)
}

/// Evaluate one station's latest hourly rollup against its effective limits.
///
/// Returns `None` when no pollutant exceeds its limit; a missing value never
/// counts as an exceedance.
pub fn evaluate_station(
    metric: &HourlyMetric,
    limits: &EffectiveLimits,
    city: &str,
) -> Option<AlertCandidate> {
    let levels: Vec<PollutantLevel> = Pollutant::ALERT_PRIORITY
        .into_iter()
        .map(|pollutant| {
            let value = metric.value(pollutant);
            let limit = limits.get(pollutant);
            let exceeded = match (value, limit) {
                (Some(v), Some(l)) => v > l,
                _ => false,
            };
            PollutantLevel {
                pollutant,
                value,
                limit,
                exceeded,
            }
        })
        .collect();

    // Levels are already in priority order, so the first exceeded entry is
    // the primary pollutant.
    let primary_pollutant = levels.iter().find(|l| l.exceeded)?.pollutant;
    let count = levels.iter().filter(|l| l.exceeded).count();
    let rule = classify_severity(count)?;

    Some(AlertCandidate {
        station_id: metric.station_id,
        alert_timestamp: metric.measure_hour,
        station_name: metric.station_name.clone(),
        city: city.to_string(),
        severity_level: rule.level,
        primary_pollutant,
        description: rule.description.to_string(),
        recommendation: rule.recommendation.to_string(),
        levels,
    })
}
