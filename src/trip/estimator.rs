//! Total lead time estimation

use crate::error::{EstimateError, Result};
use tracing::debug;

/// Default inflation applied to travel time for pessimistic travelers
pub const DEFAULT_PESSIMISM_FACTOR: f64 = 1.25;

/// Combines the buffer with travel time
#[derive(Debug, Clone)]
pub struct TripEstimator {
    pessimism_factor: f64,
}

impl Default for TripEstimator {
    fn default() -> Self {
        Self {
            pessimism_factor: DEFAULT_PESSIMISM_FACTOR,
        }
    }
}

impl TripEstimator {
    /// Create an estimator with a custom pessimism factor
    pub fn new(pessimism_factor: f64) -> Result<Self> {
        if !pessimism_factor.is_finite() || pessimism_factor < 1.0 {
            return Err(EstimateError::ConfigurationError {
                message: format!(
                    "pessimism factor must be a finite value of at least 1.0, got {}",
                    pessimism_factor
                ),
            }
            .into());
        }

        Ok(Self { pessimism_factor })
    }

    pub fn pessimism_factor(&self) -> f64 {
        self.pessimism_factor
    }

    /// Travel duration inflated by the pessimism factor, rounded down
    pub fn pessimistic_duration(&self, travel_duration_seconds: u64) -> u64 {
        (travel_duration_seconds as f64 * self.pessimism_factor).floor() as u64
    }

    /// Total lead time in seconds
    pub fn compute(&self, buffer_seconds: u64, travel_duration_seconds: u64, pessimistic: bool) -> u64 {
        let travel = if pessimistic {
            self.pessimistic_duration(travel_duration_seconds)
        } else {
            travel_duration_seconds
        };

        let total = buffer_seconds.saturating_add(travel);
        debug!(
            "Lead time: buffer {}s + travel {}s (pessimistic: {}) = {}s",
            buffer_seconds, travel, pessimistic, total
        );
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pessimistic_example() {
        let estimator = TripEstimator::default();
        assert_eq!(estimator.compute(3600, 1000, true), 4850);
    }

    #[test]
    fn test_optimistic_uses_raw_duration() {
        let estimator = TripEstimator::default();
        assert_eq!(estimator.compute(3600, 1000, false), 4600);
        assert_eq!(estimator.compute(0, 0, true), 0);
    }

    #[test]
    fn test_pessimistic_duration_floors() {
        let estimator = TripEstimator::default();
        assert_eq!(estimator.pessimistic_duration(1001), 1251); // 1251.25
        assert_eq!(estimator.pessimistic_duration(3), 3); // 3.75
    }

    #[test]
    fn test_custom_factor() {
        let estimator = TripEstimator::new(1.5).unwrap();
        assert_eq!(estimator.compute(100, 1000, true), 1600);
        assert_eq!(estimator.pessimism_factor(), 1.5);
    }

    #[test]
    fn test_huge_inputs_saturate() {
        let estimator = TripEstimator::default();
        assert_eq!(estimator.compute(u64::MAX, 1000, false), u64::MAX);
        assert_eq!(estimator.compute(4500, u64::MAX, true), u64::MAX);
    }

    #[test]
    fn test_invalid_factor() {
        assert!(TripEstimator::new(0.5).is_err());
        assert!(TripEstimator::new(f64::NAN).is_err());
        assert!(TripEstimator::new(f64::INFINITY).is_err());
    }
}
