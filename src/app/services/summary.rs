//! Summary statistics for a finished telemetry series
//!
//! A [`Summary`] is computed once from a [`Series`] and never changes. Every
//! aggregate of an empty series is 0 and every charge state is present in
//! the histogram, so consumers never see missing keys or NaN.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::app::models::{ChargeState, Series};

/// Per-channel aggregates and charge-state histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_points: usize,
    pub avg_current: f64,
    pub max_current: f64,
    pub min_current: f64,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_voltage: f64,

    /// Occurrences of each charge state, all eight keys always present
    pub charge_state_counts: BTreeMap<ChargeState, usize>,
}

impl Summary {
    /// Reduce a series to its summary
    pub fn from_series(series: &Series) -> Self {
        let mut charge_state_counts: BTreeMap<ChargeState, usize> =
            ChargeState::ALL.iter().map(|state| (*state, 0)).collect();

        for &code in series.charge_state() {
            let state = ChargeState::from_code(i64::from(code)).unwrap_or_default();
            *charge_state_counts.entry(state).or_insert(0) += 1;
        }

        Self {
            total_points: series.len(),
            avg_current: mean(series.current()),
            max_current: max(series.current()),
            min_current: min(series.current()),
            avg_temp: mean(series.temperature()),
            max_temp: max(series.temperature()),
            min_temp: min(series.temperature()),
            avg_voltage: mean(series.voltage()),
            charge_state_counts,
        }
    }

    /// Occurrences of one charge state
    pub fn count(&self, state: ChargeState) -> usize {
        self.charge_state_counts.get(&state).copied().unwrap_or(0)
    }
}

impl From<&Series> for Summary {
    fn from(series: &Series) -> Self {
        Self::from_series(series)
    }
}

/// Running mean, so large finite inputs cannot overflow a plain sum
///
/// A non-finite result is reported as 0 like any other undefined aggregate.
fn mean(values: &[f64]) -> f64 {
    let mean = values
        .iter()
        .enumerate()
        .fold(0.0, |acc, (i, value)| acc + (value - acc) / (i + 1) as f64);

    if mean.is_finite() { mean } else { 0.0 }
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Record;

    fn create_test_series() -> Series {
        [
            (100.0, 4.0, 20.0, ChargeState::ConstantCurrent),
            (-50.0, 4.2, 30.0, ChargeState::ConstantCurrent),
            (250.0, 3.8, 25.0, ChargeState::Full),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (current, voltage, temperature, state))| {
            Record::new(format!("00:00:0{}", i), current, voltage, temperature, state).unwrap()
        })
        .collect()
    }

    #[test]
    fn test_summary_aggregates() {
        let summary = Summary::from_series(&create_test_series());

        assert_eq!(summary.total_points, 3);
        assert_eq!(summary.avg_current, 100.0);
        assert_eq!(summary.max_current, 250.0);
        assert_eq!(summary.min_current, -50.0);
        assert_eq!(summary.avg_temp, 25.0);
        assert_eq!(summary.max_temp, 30.0);
        assert_eq!(summary.min_temp, 20.0);
        assert!((summary.avg_voltage - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_charge_state_histogram() {
        let summary = Summary::from_series(&create_test_series());

        assert_eq!(summary.charge_state_counts.len(), 8);
        assert_eq!(summary.count(ChargeState::ConstantCurrent), 2);
        assert_eq!(summary.count(ChargeState::Full), 1);
        assert_eq!(summary.count(ChargeState::Fault), 0);
        assert_eq!(
            summary.charge_state_counts.values().sum::<usize>(),
            summary.total_points
        );
    }

    #[test]
    fn test_empty_series_is_all_zero() {
        let summary = Summary::from_series(&Series::new());

        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.avg_current, 0.0);
        assert_eq!(summary.max_current, 0.0);
        assert_eq!(summary.min_current, 0.0);
        assert_eq!(summary.avg_temp, 0.0);
        assert_eq!(summary.max_temp, 0.0);
        assert_eq!(summary.min_temp, 0.0);
        assert_eq!(summary.avg_voltage, 0.0);
        assert_eq!(summary.charge_state_counts.len(), 8);
        assert!(summary.charge_state_counts.values().all(|count| *count == 0));
    }

    #[test]
    fn test_average_of_huge_values_stays_finite() {
        let series: Series = [1e308, 1e308]
            .into_iter()
            .map(|current| {
                Record::new("00:00:01".to_string(), current, 4.0, 1.0, ChargeState::NoCharge)
                    .unwrap()
            })
            .collect();

        let summary = Summary::from(&series);
        assert_eq!(summary.avg_current, 1e308);
        assert_eq!(summary.max_current, 1e308);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["avgCurrent"], 1e308);
    }

    #[test]
    fn test_average_overflow_reports_zero() {
        assert_eq!(mean(&[-1e308, 1e308, 1e308]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_summary_serialization_contract() {
        let value = serde_json::to_value(Summary::from_series(&Series::new())).unwrap();

        assert_eq!(value["totalPoints"], 0);
        assert_eq!(value["avgVoltage"], 0.0);
        for key in [
            "no_charge",
            "discharge",
            "precharge",
            "cc_charge",
            "cv_charge",
            "full",
            "done",
            "fault",
        ] {
            assert_eq!(value["chargeStateCounts"][key], 0, "missing key {}", key);
        }
    }
}
