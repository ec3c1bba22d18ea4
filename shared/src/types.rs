//! Pollutant reference data used across the platform

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pollutants reported by the municipal open-data feeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    So2,
    No2,
    O3,
    Co,
    Pm10,
    Pm25,
}

impl Pollutant {
    /// Every pollutant the feed reports, in column order.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::Co,
        Pollutant::Pm10,
        Pollutant::Pm25,
    ];

    /// Scan order when picking the primary pollutant of an alert.
    /// First exceeded entry wins, not the worst value.
    pub const ALERT_PRIORITY: [Pollutant; 6] = [
        Pollutant::No2,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::O3,
        Pollutant::Co,
    ];

    /// Lowercase feed/database code.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::So2 => "so2",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::Co => "co",
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm25",
        }
    }

    /// Human-readable name used in outbound messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Pollutant::So2 => "SO₂",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
            Pollutant::Co => "CO",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
        }
    }

    /// Measurement unit as published by the feed.
    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }

    /// Fixed WHO-style reference limit, where one exists.
    ///
    /// CO is reported in mg/m³ and carries no fixed reference here; it can
    /// only exceed a dynamically derived threshold.
    pub fn fixed_limit(&self) -> Option<f64> {
        match self {
            Pollutant::No2 => Some(25.0),
            Pollutant::Pm25 => Some(15.0),
            Pollutant::Pm10 => Some(45.0),
            Pollutant::So2 => Some(40.0),
            Pollutant::O3 => Some(100.0),
            Pollutant::Co => None,
        }
    }

    /// Parse a lowercase feed/database code.
    pub fn from_code(code: &str) -> Option<Pollutant> {
        Pollutant::ALL.into_iter().find(|p| p.code() == code)
    }

    /// Stable position used to index per-pollutant arrays.
    pub(crate) fn idx(&self) -> usize {
        match self {
            Pollutant::So2 => 0,
            Pollutant::No2 => 1,
            Pollutant::O3 => 2,
            Pollutant::Co => 3,
            Pollutant::Pm10 => 4,
            Pollutant::Pm25 => 5,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for p in Pollutant::ALL {
            assert_eq!(Pollutant::from_code(p.code()), Some(p));
        }
        assert_eq!(Pollutant::from_code("nox"), None);
    }

    #[test]
    fn test_alert_priority_starts_with_no2() {
        assert_eq!(Pollutant::ALERT_PRIORITY[0], Pollutant::No2);
        assert_eq!(Pollutant::ALERT_PRIORITY[1], Pollutant::Pm25);
        assert_eq!(Pollutant::ALERT_PRIORITY.len(), Pollutant::ALL.len());
    }

    #[test]
    fn test_co_has_no_fixed_limit() {
        assert_eq!(Pollutant::Co.fixed_limit(), None);
        for p in [Pollutant::No2, Pollutant::Pm25, Pollutant::Pm10, Pollutant::So2, Pollutant::O3] {
            assert!(p.fixed_limit().is_some());
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(Pollutant::Co.unit(), "mg/m³");
        assert_eq!(Pollutant::No2.unit(), "µg/m³");
    }
}
