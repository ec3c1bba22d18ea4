//! Alert candidates and the delivery records that gate re-notification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Pollutant;

/// Per-pollutant evaluation outcome inside an alert candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollutantLevel {
    pub pollutant: Pollutant,
    pub value: Option<f64>,
    pub limit: Option<f64>,
    pub exceeded: bool,
}

/// A station+hour where at least one pollutant exceeds its effective limit.
///
/// Computed on demand from the hourly rollups; never persisted itself, only
/// its per-pollutant deliveries are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertCandidate {
    pub station_id: i32,
    pub alert_timestamp: DateTime<Utc>,
    pub station_name: String,
    pub city: String,
    pub severity_level: u8,
    pub primary_pollutant: Pollutant,
    pub description: String,
    pub recommendation: String,
    pub levels: Vec<PollutantLevel>,
}

impl AlertCandidate {
    /// Number of pollutants currently over their limit.
    pub fn exceedance_count(&self) -> usize {
        self.levels.iter().filter(|l| l.exceeded).count()
    }

    /// Expand this candidate into one delivery row per exceeded pollutant.
    pub fn deliveries(&self) -> Vec<AlertDelivery> {
        self.levels
            .iter()
            .filter(|l| l.exceeded)
            .filter_map(|l| {
                Some(AlertDelivery {
                    station_id: self.station_id,
                    alert_timestamp: self.alert_timestamp,
                    pollutant: l.pollutant,
                    value: l.value?,
                    limit: l.limit?,
                    station_name: self.station_name.clone(),
                    city: self.city.clone(),
                })
            })
            .collect()
    }
}

/// One (station, hour, pollutant) notification, the unit recorded in the
/// permanent delivery ledger. The triple is the identity; a repeat insert
/// is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertDelivery {
    pub station_id: i32,
    pub alert_timestamp: DateTime<Utc>,
    pub pollutant: Pollutant,
    pub value: f64,
    pub limit: f64,
    pub station_name: String,
    pub city: String,
}

impl AlertDelivery {
    /// Identity triple used by the delivery ledger.
    pub fn key(&self) -> (i32, DateTime<Utc>, Pollutant) {
        (self.station_id, self.alert_timestamp, self.pollutant)
    }
}
