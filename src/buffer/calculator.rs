//! Travel buffer calculation
//!
//! This module turns trip preferences and the current checkpoint delay into
//! the buffer a traveler should allow on top of travel time.

use crate::error::{EstimateError, Result};
use crate::types::{BufferResult, TripPreferences};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed buffer contributions, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Base allowance for a domestic flight
    pub domestic_seconds: u64,
    /// Base allowance for an international flight
    pub international_seconds: u64,
    /// Extra time to check bags
    pub checked_bags_seconds: u64,
    /// Extra time to return a rental car
    pub rental_car_seconds: u64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            domestic_seconds: 4500,       // 1h15m
            international_seconds: 10800, // 3h
            checked_bags_seconds: 900,    // 15m
            rental_car_seconds: 1800,     // 30m
        }
    }
}

impl BufferConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.international_seconds < self.domestic_seconds {
            return Err(EstimateError::ConfigurationError {
                message: "international_seconds must not be less than domestic_seconds"
                    .to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Combines checkpoint delay with the categorical allowances
#[derive(Debug, Clone, Default)]
pub struct BufferCalculator {
    config: BufferConfig,
}

impl BufferCalculator {
    /// Create a new buffer calculator
    pub fn new(config: BufferConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Compute the buffer for a trip
    ///
    /// The checkpoint delay is skipped only when the traveler holds an
    /// expedited credential and the airport offers expedited screening.
    pub fn compute(
        &self,
        preferences: &TripPreferences,
        airport_offers_expedited: bool,
        checkpoint_delay_seconds: u64,
    ) -> BufferResult {
        let checkpoint_seconds =
            if preferences.has_expedited_credential && airport_offers_expedited {
                0
            } else {
                checkpoint_delay_seconds
            };

        let travel_class_seconds = if preferences.international {
            self.config.international_seconds
        } else {
            self.config.domestic_seconds
        };

        let checked_bags_seconds = if preferences.checked_bags {
            self.config.checked_bags_seconds
        } else {
            0
        };

        let rental_car_seconds = if preferences.rental_car {
            self.config.rental_car_seconds
        } else {
            0
        };

        let result = BufferResult {
            total_seconds: checkpoint_seconds
                .saturating_add(travel_class_seconds)
                .saturating_add(checked_bags_seconds)
                .saturating_add(rental_car_seconds),
            checkpoint_seconds,
            travel_class_seconds,
            checked_bags_seconds,
            rental_car_seconds,
        };

        debug!("Computed buffer: {:?}", result);
        result
    }
}
