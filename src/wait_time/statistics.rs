//! Checkpoint wait time statistics
//!
//! This module groups a feed snapshot by checkpoint and derives the
//! statistics used for buffer estimation: conservative windowed averages,
//! the worst wait ever reported, and the slowest checkpoint right now.
//! Source readings are never mutated; every statistic is recomputed from
//! the snapshot on request.

use crate::error::{EstimateError, Result};
use crate::types::{Airport, Checkpoint, CheckpointInfo, FeedSnapshot, Reading, WorstWait};
use crate::utils::ceiling_average_seconds;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of most-recent readings averaged when no window is given
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Per-checkpoint summary used in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSummary {
    pub id: String,
    pub name: String,
    pub reading_count: usize,
    pub latest_seconds: Option<u64>,
    pub average_seconds: Option<u64>,
}

/// Statistics over one airport's feed snapshot
#[derive(Debug, Clone)]
pub struct CheckpointAggregator {
    shortcode: String,
    readings: Vec<Reading>,
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointAggregator {
    /// Build an aggregator for an airport from a feed snapshot
    ///
    /// Fails when the airport metadata lists no checkpoints.
    pub fn new(airport: &Airport, snapshot: &FeedSnapshot) -> Result<Self> {
        if airport.checkpoints.is_empty() {
            return Err(EstimateError::EmptyCheckpointList {
                shortcode: airport.shortcode.clone(),
            }
            .into());
        }

        let checkpoints = Self::group_by_checkpoint(&snapshot.readings, &airport.checkpoints);

        Ok(Self {
            shortcode: airport.shortcode.clone(),
            readings: snapshot.readings.clone(),
            checkpoints,
        })
    }

    /// Partition readings by checkpoint, keeping feed order within each group
    ///
    /// Readings for checkpoints missing from the metadata are dropped.
    pub fn group_by_checkpoint(readings: &[Reading], checkpoints: &[CheckpointInfo]) -> Vec<Checkpoint> {
        let grouped: Vec<Checkpoint> = checkpoints
            .iter()
            .map(|info| Checkpoint {
                id: info.id.clone(),
                name: info.long_name.clone(),
                readings: readings
                    .iter()
                    .filter(|reading| reading.checkpoint_id == info.id)
                    .cloned()
                    .collect(),
            })
            .collect();

        let matched: usize = grouped.iter().map(Checkpoint::reading_count).sum();
        if matched < readings.len() {
            debug!(
                "Dropped {} readings for checkpoints missing from metadata",
                readings.len() - matched
            );
        }

        grouped
    }

    pub fn shortcode(&self) -> &str {
        &self.shortcode
    }

    /// Checkpoints in metadata order, each with its readings
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Look up a checkpoint by identifier
    pub fn checkpoint(&self, checkpoint_id: &str) -> Result<&Checkpoint> {
        self.checkpoints
            .iter()
            .find(|checkpoint| checkpoint.id == checkpoint_id)
            .ok_or_else(|| {
                EstimateError::UnknownCheckpoint {
                    shortcode: self.shortcode.clone(),
                    checkpoint_id: checkpoint_id.to_string(),
                }
                .into()
            })
    }

    /// Ceiling average of a checkpoint's most recent `window_size` readings, in seconds
    ///
    /// With fewer readings than the window, averages over those available.
    pub fn average_wait(&self, checkpoint_id: &str, window_size: usize) -> Result<u64> {
        let checkpoint = self.checkpoint(checkpoint_id)?;
        let codes = checkpoint
            .readings
            .iter()
            .take(window_size)
            .map(|reading| u64::from(reading.wait_code));

        let average = ceiling_average_seconds(codes).ok_or_else(|| EstimateError::InsufficientData {
            context: format!("checkpoint {} at {}", checkpoint_id, self.shortcode),
        })?;

        debug!(
            "Average wait for {}/{} over {} readings: {}s",
            self.shortcode,
            checkpoint_id,
            checkpoint.reading_count().min(window_size),
            average
        );

        Ok(average)
    }

    /// Ceiling average of the first `window_size` feed entries, regardless of checkpoint
    pub fn average_across_all_checkpoints(&self, window_size: usize) -> Result<u64> {
        let codes = self
            .readings
            .iter()
            .take(window_size)
            .map(|reading| u64::from(reading.wait_code));

        ceiling_average_seconds(codes).ok_or_else(|| {
            EstimateError::InsufficientData {
                context: format!("any checkpoint at {}", self.shortcode),
            }
            .into()
        })
    }

    /// The longest wait across all checkpoints
    ///
    /// Equal codes are resolved in favour of the newer reading. Readings keep
    /// their (checkpoint, timestamp) identity, so checkpoints reporting at the
    /// same moment are all considered. Readings for checkpoints missing from
    /// the airport metadata are not scanned.
    pub fn worst_wait_time_ever(&self) -> Result<WorstWait> {
        self.checkpoints
            .iter()
            .flat_map(|checkpoint| checkpoint.readings.iter())
            .max_by(|a, b| {
                a.wait_code
                    .cmp(&b.wait_code)
                    .then_with(|| a.created_at.cmp(&b.created_at))
                    .then_with(|| b.checkpoint_id.cmp(&a.checkpoint_id))
            })
            .map(|reading| WorstWait {
                checkpoint_id: reading.checkpoint_id.clone(),
                created_at: reading.created_at,
                seconds: reading.wait_seconds(),
            })
            .ok_or_else(|| {
                EstimateError::InsufficientData {
                    context: format!("any checkpoint at {}", self.shortcode),
                }
                .into()
            })
    }

    /// Largest current wait across checkpoints, in seconds
    ///
    /// Compares the newest reading of every checkpoint. Returns `None` when
    /// any checkpoint has no reading at all.
    pub fn slowest_checkpoint_now(&self) -> Option<u64> {
        self.checkpoints
            .iter()
            .map(|checkpoint| checkpoint.latest().map(Reading::wait_seconds))
            .collect::<Option<Vec<u64>>>()
            .and_then(|latest| latest.into_iter().max())
    }

    /// `slowest_checkpoint_now`, with 0 substituted when data is missing
    ///
    /// Fail-soft: an estimate should still be produced when a checkpoint
    /// has no live reading.
    pub fn slowest_checkpoint_now_or_zero(&self) -> u64 {
        match self.slowest_checkpoint_now() {
            Some(seconds) => seconds,
            None => {
                warn!(
                    "One or more checkpoints at {} reported no wait times; using 0s checkpoint delay",
                    self.shortcode
                );
                0
            }
        }
    }

    /// Summaries for every checkpoint, averaging over `window_size` readings
    pub fn summaries(&self, window_size: usize) -> Vec<CheckpointSummary> {
        self.checkpoints
            .iter()
            .map(|checkpoint| CheckpointSummary {
                id: checkpoint.id.clone(),
                name: checkpoint.name.clone(),
                reading_count: checkpoint.reading_count(),
                latest_seconds: checkpoint.latest().map(Reading::wait_seconds),
                average_seconds: self.average_wait(&checkpoint.id, window_size).ok(),
            })
            .collect()
    }
}
