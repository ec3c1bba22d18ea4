//! Alert evaluation tests
//!
//! Property-based and unit tests for:
//! - Severity monotonicity (more exceedances never lower the level)
//! - Null-safety of exceedance flags
//! - Primary pollutant priority order

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use shared::{
    classify_severity, evaluate_station, EffectiveLimits, HourlyMetric, Pollutant,
};

// ============================================================================
// Helpers
// ============================================================================

fn metric_with(values: [Option<f64>; 6]) -> HourlyMetric {
    // Order: so2, no2, o3, co, pm10, pm25
    HourlyMetric {
        station_id: 11,
        station_name: "Bulevard Sud".to_string(),
        measure_hour: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        avg_so2: values[0],
        avg_no2: values[1],
        avg_o3: values[2],
        avg_co: values[3],
        avg_pm10: values[4],
        avg_pm25: values[5],
    }
}

/// A value guaranteed to exceed the pollutant's fixed limit.
fn over(p: Pollutant) -> f64 {
    p.fixed_limit().unwrap() + 10.0
}

/// A value guaranteed below the pollutant's fixed limit.
fn under(p: Pollutant) -> f64 {
    p.fixed_limit().unwrap() / 2.0
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_clean_station_produces_no_candidate() {
    let m = metric_with([
        Some(under(Pollutant::So2)),
        Some(under(Pollutant::No2)),
        Some(under(Pollutant::O3)),
        Some(1.0),
        Some(under(Pollutant::Pm10)),
        Some(under(Pollutant::Pm25)),
    ]);
    assert!(evaluate_station(&m, &EffectiveLimits::fixed(), "valencia").is_none());
}

#[test]
fn test_null_no2_with_pm25_over_limit() {
    // no2=None, pm25=60 against its limit of 15
    let m = metric_with([None, None, None, None, None, Some(60.0)]);
    let alert = evaluate_station(&m, &EffectiveLimits::fixed(), "valencia").unwrap();

    assert_eq!(alert.exceedance_count(), 1);
    assert_eq!(alert.severity_level, 1);
    assert_eq!(alert.primary_pollutant, Pollutant::Pm25);
}

#[test]
fn test_primary_is_priority_order_first_match() {
    // so2 and o3 both exceed; so2 precedes o3 in the priority order
    let m = metric_with([
        Some(over(Pollutant::So2)),
        None,
        Some(over(Pollutant::O3)),
        None,
        None,
        None,
    ]);
    let alert = evaluate_station(&m, &EffectiveLimits::fixed(), "valencia").unwrap();
    assert_eq!(alert.primary_pollutant, Pollutant::So2);
}

#[test]
fn test_severity_policy_rows_are_ordered_most_severe_first() {
    assert_eq!(classify_severity(0).map(|r| r.level), None);
    assert_eq!(classify_severity(1).map(|r| r.level), Some(1));
    assert_eq!(classify_severity(2).map(|r| r.level), Some(2));
    assert_eq!(classify_severity(3).map(|r| r.level), Some(3));
    assert_eq!(classify_severity(6).map(|r| r.level), Some(3));
}

#[test]
fn test_candidate_carries_policy_wording() {
    let m = metric_with([None, Some(over(Pollutant::No2)), None, None, None, None]);
    let alert = evaluate_station(&m, &EffectiveLimits::fixed(), "valencia").unwrap();

    assert!(!alert.description.is_empty());
    assert!(!alert.recommendation.is_empty());
    assert_eq!(alert.city, "valencia");
    assert_eq!(alert.alert_timestamp, m.measure_hour);
}

// ============================================================================
// Property Tests
// ============================================================================

/// Strategy: a subset of the five fixed-limit pollutants to push over limit.
fn exceeding_subset() -> impl Strategy<Value = Vec<Pollutant>> {
    let candidates = vec![
        Pollutant::No2,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::O3,
    ];
    proptest::sample::subsequence(candidates, 0..=5)
}

fn metric_exceeding(pollutants: &[Pollutant]) -> HourlyMetric {
    let mut values: [Option<f64>; 6] = [None; 6];
    for p in pollutants {
        let slot = match p {
            Pollutant::So2 => 0,
            Pollutant::No2 => 1,
            Pollutant::O3 => 2,
            Pollutant::Co => 3,
            Pollutant::Pm10 => 4,
            Pollutant::Pm25 => 5,
        };
        values[slot] = Some(over(*p));
    }
    metric_with(values)
}

proptest! {
    /// Severity never decreases when another pollutant starts exceeding.
    #[test]
    fn prop_severity_monotone_in_exceedance_count(subset in exceeding_subset(), pick in 0usize..5) {
        let base = metric_exceeding(&subset);
        let limits = EffectiveLimits::fixed();

        let level_of = |m: &HourlyMetric| {
            evaluate_station(m, &limits, "valencia").map_or(0, |a| a.severity_level)
        };

        let base_level = level_of(&base);

        // Grow the exceeding set by one pollutant not already present
        let all = [Pollutant::No2, Pollutant::Pm25, Pollutant::Pm10, Pollutant::So2, Pollutant::O3];
        let remaining: Vec<Pollutant> =
            all.into_iter().filter(|p| !subset.contains(p)).collect();
        if !remaining.is_empty() {
            let mut grown = subset.clone();
            grown.push(remaining[pick % remaining.len()]);
            let grown_level = level_of(&metric_exceeding(&grown));
            prop_assert!(grown_level >= base_level);
        }
    }

    /// The computed level always matches the exceedance count policy.
    #[test]
    fn prop_level_matches_count(subset in exceeding_subset()) {
        let m = metric_exceeding(&subset);
        let alert = evaluate_station(&m, &EffectiveLimits::fixed(), "valencia");

        match subset.len() {
            0 => prop_assert!(alert.is_none()),
            1 => prop_assert_eq!(alert.unwrap().severity_level, 1),
            2 => prop_assert_eq!(alert.unwrap().severity_level, 2),
            _ => prop_assert_eq!(alert.unwrap().severity_level, 3),
        }
    }

    /// Values at or below the limit never raise a flag, whatever the mix.
    #[test]
    fn prop_at_or_below_limit_never_alerts(fraction in 0.0f64..=1.0) {
        let m = metric_with([
            Some(Pollutant::So2.fixed_limit().unwrap() * fraction),
            Some(Pollutant::No2.fixed_limit().unwrap() * fraction),
            Some(Pollutant::O3.fixed_limit().unwrap() * fraction),
            None,
            Some(Pollutant::Pm10.fixed_limit().unwrap() * fraction),
            Some(Pollutant::Pm25.fixed_limit().unwrap() * fraction),
        ]);
        prop_assert!(evaluate_station(&m, &EffectiveLimits::fixed(), "valencia").is_none());
    }
}
