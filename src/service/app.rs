//! Trip planning and service coordination
//!
//! This module contains the `TripPlanner` that wires metadata, the wait-time
//! feed, travel estimates and the calculators into a single estimate.

use crate::buffer::BufferCalculator;
use crate::config::AppConfig;
use crate::error::{EstimateError, Result};
use crate::metadata::{InMemoryMetadataStore, MetadataStore};
use crate::source::{
    CachedSnapshotSource, FileResponseCache, FileSnapshotSource, ResponseCache, SnapshotSource,
};
use crate::travel::{DistanceMatrixSource, TravelEstimateSource};
use crate::trip::TripEstimator;
use crate::types::{BufferResult, TravelEstimate, TripPreferences, WorstWait};
use crate::utils::normalize_shortcode;
use crate::wait_time::{CheckpointAggregator, CheckpointSummary, TsaWaitTimeFeed, WaitTimeFeed};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A traveler's request for a lead time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination airport shortcode
    pub airport: String,
    /// Departure address
    pub origin: String,
    pub preferences: TripPreferences,
}

/// Everything the report needs about one estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripEstimate {
    pub airport_shortcode: String,
    pub airport_name: String,
    pub origin: String,
    pub preferences: TripPreferences,
    pub travel: TravelEstimate,
    /// Travel time after any pessimistic inflation
    pub adjusted_travel_seconds: u64,
    pub buffer: BufferResult,
    pub total_seconds: u64,
    /// Newest-reading maximum; `None` when a checkpoint had no reading
    pub slowest_now_seconds: Option<u64>,
    pub average_all_seconds: Option<u64>,
    pub worst_ever: Option<WorstWait>,
    pub checkpoints: Vec<CheckpointSummary>,
}

/// Produces lead time estimates from the configured collaborators
pub struct TripPlanner {
    metadata: Arc<dyn MetadataStore>,
    feed: Arc<dyn WaitTimeFeed>,
    travel: Arc<dyn TravelEstimateSource>,
    buffer_calculator: BufferCalculator,
    estimator: TripEstimator,
    window_size: usize,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl TripPlanner {
    /// Create a planner with default calculators
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        feed: Arc<dyn WaitTimeFeed>,
        travel: Arc<dyn TravelEstimateSource>,
    ) -> Self {
        Self {
            metadata,
            feed,
            travel,
            buffer_calculator: BufferCalculator::default(),
            estimator: TripEstimator::default(),
            window_size: crate::wait_time::DEFAULT_WINDOW_SIZE,
            cache: None,
        }
    }

    pub fn with_buffer_calculator(mut self, buffer_calculator: BufferCalculator) -> Self {
        self.buffer_calculator = buffer_calculator;
        self
    }

    pub fn with_estimator(mut self, estimator: TripEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Build a planner backed by the files named in the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let metadata = InMemoryMetadataStore::from_json_file(&config.data.metadata_path)?;

        let files = FileSnapshotSource::new(config.data.snapshot_dir.clone());
        let cache: Option<Arc<dyn ResponseCache>> = if config.data.use_cache {
            Some(Arc::new(FileResponseCache::load(
                config.data.cache_path.clone(),
            )?))
        } else {
            None
        };

        let source: Arc<dyn SnapshotSource> = match &cache {
            Some(cache) => Arc::new(CachedSnapshotSource::new(files, Arc::clone(cache))),
            None => Arc::new(files),
        };

        let feed = TsaWaitTimeFeed::new(source.clone());
        let mut travel =
            DistanceMatrixSource::new(source).with_units(config.data.distance_units.clone());
        if let Some(key) = &config.data.distance_api_key {
            travel = travel.with_api_key(key.clone());
        }

        let mut planner = Self::new(Arc::new(metadata), Arc::new(feed), Arc::new(travel))
            .with_buffer_calculator(BufferCalculator::new(config.estimation.buffer.clone())?)
            .with_estimator(TripEstimator::new(config.estimation.pessimism_factor)?)
            .with_window_size(config.estimation.window_size);
        planner.cache = cache;

        Ok(planner)
    }

    /// Flush the response cache, if one is configured
    pub fn shutdown(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.persist()?;
            debug!("Persisted {} cached responses", cache.len()?);
        }
        Ok(())
    }

    /// Estimate the lead time for a trip
    pub fn plan(&self, request: &TripRequest) -> Result<TripEstimate> {
        let shortcode = normalize_shortcode(&request.airport)?;
        let airport = self.metadata.airport(&shortcode)?;
        let snapshot = self.feed.snapshot(&shortcode)?;
        let aggregator = CheckpointAggregator::new(&airport, &snapshot)?;

        let travel = self.travel.estimate(&request.origin, &shortcode)?;

        let slowest_now_seconds = aggregator.slowest_checkpoint_now();
        let checkpoint_delay = aggregator.slowest_checkpoint_now_or_zero();

        let buffer = self.buffer_calculator.compute(
            &request.preferences,
            airport.has_expedited_screening(),
            checkpoint_delay,
        );

        let pessimistic = request.preferences.pessimistic;
        let total_seconds =
            self.estimator
                .compute(buffer.total_seconds, travel.duration_seconds, pessimistic);
        let adjusted_travel_seconds = if pessimistic {
            self.estimator.pessimistic_duration(travel.duration_seconds)
        } else {
            travel.duration_seconds
        };

        let average_all_seconds =
            optional_statistic(aggregator.average_across_all_checkpoints(self.window_size))?;
        let worst_ever = optional_statistic(aggregator.worst_wait_time_ever())?;

        info!(
            "Estimated lead time for {} from '{}': {}s (buffer {}s)",
            shortcode, request.origin, total_seconds, buffer.total_seconds
        );

        Ok(TripEstimate {
            airport_shortcode: airport.shortcode.clone(),
            airport_name: airport.name.clone(),
            origin: request.origin.clone(),
            preferences: request.preferences,
            travel,
            adjusted_travel_seconds,
            buffer,
            total_seconds,
            slowest_now_seconds,
            average_all_seconds,
            worst_ever,
            checkpoints: aggregator.summaries(self.window_size),
        })
    }
}

/// Treat a statistic with no readings as absent; propagate every other error
fn optional_statistic<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => match e.downcast_ref::<EstimateError>() {
            Some(EstimateError::InsufficientData { context }) => {
                warn!("Statistic unavailable: no readings for {}", context);
                Ok(None)
            }
            _ => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::travel::StaticTravelEstimate;
    use crate::types::{Airport, CheckpointInfo, Reading};
    use crate::wait_time::StaticWaitTimeFeed;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 2, 3)
            .unwrap()
            .and_hms_opt(16, minute, 0)
            .unwrap()
    }

    fn planner(readings: Vec<Reading>, precheck: bool, duration: u64) -> TripPlanner {
        let metadata = InMemoryMetadataStore::from_airports(vec![Airport::new(
            "DCA",
            "Ronald Reagan Washington National",
            precheck,
            vec![
                CheckpointInfo::new("1", "Terminal A"),
                CheckpointInfo::new("2", "Terminal B"),
            ],
        )]);
        let feed = StaticWaitTimeFeed::new().with_readings("DCA", readings);

        TripPlanner::new(
            Arc::new(metadata),
            Arc::new(feed),
            Arc::new(StaticTravelEstimate::from_duration(duration)),
        )
    }

    fn request(preferences: TripPreferences) -> TripRequest {
        TripRequest {
            airport: "dca".to_string(),
            origin: "Washington,DC".to_string(),
            preferences,
        }
    }

    #[test]
    fn test_plan_domestic_trip() {
        let readings = vec![
            Reading::new("1", 2, at(30)),
            Reading::new("2", 3, at(30)),
            Reading::new("1", 1, at(20)),
        ];
        let estimate = planner(readings, true, 900)
            .plan(&request(TripPreferences::default()))
            .unwrap();

        assert_eq!(estimate.airport_shortcode, "DCA");
        assert_eq!(estimate.slowest_now_seconds, Some(1800));
        assert_eq!(estimate.buffer.checkpoint_seconds, 1800);
        assert_eq!(estimate.buffer.total_seconds, 1800 + 4500);
        assert_eq!(estimate.total_seconds, 1800 + 4500 + 900);
        assert_eq!(estimate.average_all_seconds, Some(1200));
        assert_eq!(estimate.worst_ever.as_ref().unwrap().seconds, 1800);
        assert_eq!(estimate.checkpoints.len(), 2);
    }

    #[test]
    fn test_plan_expedited_pessimist() {
        let readings = vec![Reading::new("1", 6, at(30)), Reading::new("2", 6, at(30))];
        let preferences = TripPreferences {
            has_expedited_credential: true,
            pessimistic: true,
            ..Default::default()
        };
        let estimate = planner(readings, true, 1000).plan(&request(preferences)).unwrap();

        assert_eq!(estimate.buffer.checkpoint_seconds, 0);
        assert_eq!(estimate.adjusted_travel_seconds, 1250);
        assert_eq!(estimate.total_seconds, 4500 + 1250);
    }

    #[test]
    fn test_plan_without_readings_reports_missing_statistics() {
        let estimate = planner(Vec::new(), false, 600)
            .plan(&request(TripPreferences::default()))
            .unwrap();

        assert_eq!(estimate.slowest_now_seconds, None);
        assert_eq!(estimate.buffer.checkpoint_seconds, 0);
        assert_eq!(estimate.average_all_seconds, None);
        assert!(estimate.worst_ever.is_none());
        assert_eq!(estimate.total_seconds, 4500 + 600);
    }

    #[test]
    fn test_plan_unknown_airport() {
        let mut req = request(TripPreferences::default());
        req.airport = "SFO".to_string();

        let err = planner(Vec::new(), false, 600).plan(&req).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EstimateError>(),
            Some(EstimateError::UnknownAirport { .. })
        ));
    }

    #[test]
    fn test_optional_statistic_propagates_other_errors() {
        let missing: Result<u64> = Err(EstimateError::InsufficientData {
            context: "x".to_string(),
        }
        .into());
        assert_eq!(optional_statistic(missing).unwrap(), None);

        let broken: Result<u64> = Err(EstimateError::UnknownCheckpoint {
            shortcode: "DCA".to_string(),
            checkpoint_id: "9".to_string(),
        }
        .into());
        assert!(optional_statistic(broken).is_err());
    }
}
