use crate::config::MetTable;
use std::collections::BTreeMap;
use std::time::Duration;

/// `MET * weight_kg * minutes`.
pub fn kcal(met: f64, elapsed: Duration, weight_kg: f64) -> f64 {
    met * weight_kg * (elapsed.as_millis() as f64 / 60_000.0)
}

/// Reported values are rounded to one decimal; the running total is not.
pub fn round_kcal(kcal: f64) -> f64 {
    (kcal * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct CalorieEstimator {
    met_table: MetTable,
    weight_kg: f64,
    total: f64,
    per_action: BTreeMap<String, f64>,
}

impl CalorieEstimator {
    pub fn new(met_table: MetTable, weight_kg: f64) -> Self {
        Self {
            met_table,
            weight_kg: weight_kg.max(0.0),
            total: 0.0,
            per_action: BTreeMap::new(),
        }
    }

    /// Credits `elapsed` of `action` and returns the kcal added.
    pub fn accumulate(&mut self, action: &str, elapsed: Duration) -> f64 {
        let delta = kcal(self.met_table.met(action), elapsed, self.weight_kg).max(0.0);
        self.total += delta;
        *self.per_action.entry(action.to_string()).or_insert(0.0) += delta;
        delta
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn total_for(&self, action: &str) -> f64 {
        self.per_action.get(action).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod estimator_test {
    use super::*;

    #[test]
    fn test_kcal_formula() {
        let delta = kcal(8.0, Duration::from_millis(600), 70.0);

        assert!((delta - 5.6).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_action_uses_default_met() {
        let mut estimator = CalorieEstimator::new(MetTable::default(), 60.0);

        let delta = estimator.accumulate("burpee", Duration::from_secs(60));

        assert!((delta - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_accumulates_per_action_and_total() {
        let mut estimator = CalorieEstimator::new(MetTable::default(), 70.0);

        estimator.accumulate("pushup", Duration::from_millis(300));
        estimator.accumulate("squat", Duration::from_millis(600));
        estimator.accumulate("pushup", Duration::from_millis(300));

        assert!((estimator.total_for("pushup") - 5.6).abs() < 1e-9);
        assert!((estimator.total_for("squat") - 3.85).abs() < 1e-9);
        assert!((estimator.total() - 9.45).abs() < 1e-9);
        assert_eq!(estimator.total_for("seated_row"), 0.0);
    }

    #[test]
    fn test_total_never_decreases() {
        let mut estimator = CalorieEstimator::new(MetTable::default(), 70.0);
        let mut previous = 0.0;

        for ms in [0, 10, 300, 0, 1, 5000] {
            estimator.accumulate("squat", Duration::from_millis(ms));
            assert!(estimator.total() >= previous);
            previous = estimator.total();
        }
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        assert_eq!(round_kcal(5.6000000000000005), 5.6);
        assert_eq!(round_kcal(5.65), 5.7);
        assert_eq!(round_kcal(0.04), 0.0);
        assert_eq!(round_kcal(12.349), 12.3);
    }
}
