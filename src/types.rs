//! Common types used throughout the estimator

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier of a security checkpoint within an airport
pub type CheckpointId = String;

/// Feed wait bucket; one unit is ten minutes of waiting, 0 means no wait
pub type WaitCode = u32;

/// Seconds represented by a single wait-code unit
pub const SECONDS_PER_WAIT_CODE: u64 = 600;

/// A single timestamped wait-time reading from the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub checkpoint_id: CheckpointId,
    pub wait_code: WaitCode,
    pub created_at: NaiveDateTime,
}

impl Reading {
    pub fn new(
        checkpoint_id: impl Into<CheckpointId>,
        wait_code: WaitCode,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            checkpoint_id: checkpoint_id.into(),
            wait_code,
            created_at,
        }
    }

    /// Wait represented by this reading, in seconds
    pub fn wait_seconds(&self) -> u64 {
        crate::utils::code_to_seconds(u64::from(self.wait_code))
    }
}

/// Checkpoint as described by airport metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointInfo {
    pub id: CheckpointId,
    #[serde(rename = "longname")]
    pub long_name: String,
    #[serde(rename = "shortname", default)]
    pub short_name: String,
}

impl CheckpointInfo {
    pub fn new(id: impl Into<CheckpointId>, long_name: impl Into<String>) -> Self {
        let long_name = long_name.into();
        Self {
            id: id.into(),
            short_name: long_name.clone(),
            long_name,
        }
    }
}

/// A checkpoint together with its readings, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub name: String,
    pub readings: Vec<Reading>,
}

impl Checkpoint {
    /// The most recent reading, if the feed reported any
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.first()
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }
}

/// Static airport metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub shortcode: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "utc", default)]
    pub utc_offset: Option<String>,
    #[serde(rename = "dst", default)]
    pub observes_dst: Option<bool>,
    /// Whether the airport runs an expedited screening lane
    #[serde(rename = "precheck", default)]
    pub expedited_screening: bool,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointInfo>,
}

impl Airport {
    pub fn new(
        shortcode: impl Into<String>,
        name: impl Into<String>,
        expedited_screening: bool,
        checkpoints: Vec<CheckpointInfo>,
    ) -> Self {
        Self {
            shortcode: shortcode.into(),
            name: name.into(),
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            utc_offset: None,
            observes_dst: None,
            expedited_screening,
            checkpoints,
        }
    }

    pub fn has_expedited_screening(&self) -> bool {
        self.expedited_screening
    }

    pub fn num_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }
}

/// One snapshot of the wait-time feed for an airport
///
/// Readings keep the order the feed delivered them in, which is newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub shortcode: String,
    pub readings: Vec<Reading>,
}

impl FeedSnapshot {
    pub fn new(shortcode: impl Into<String>, readings: Vec<Reading>) -> Self {
        Self {
            shortcode: shortcode.into(),
            readings,
        }
    }
}

/// Traveler answers that shape the buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPreferences {
    pub has_expedited_credential: bool,
    pub international: bool,
    pub checked_bags: bool,
    pub rental_car: bool,
    pub pessimistic: bool,
}

/// Buffer total with its itemized contributions, all in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferResult {
    pub total_seconds: u64,
    pub checkpoint_seconds: u64,
    pub travel_class_seconds: u64,
    pub checked_bags_seconds: u64,
    pub rental_car_seconds: u64,
}

/// Travel duration and distance from the origin to the airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub origin_address: String,
    pub destination_address: String,
    pub duration_seconds: u64,
    pub duration_text: String,
    pub distance_meters: u64,
    pub distance_text: String,
}

impl TravelEstimate {
    /// Estimate carrying only a duration, for callers that have nothing else
    pub fn from_duration(duration_seconds: u64) -> Self {
        Self {
            origin_address: String::new(),
            destination_address: String::new(),
            duration_seconds,
            duration_text: format!("{} mins", duration_seconds / 60),
            distance_meters: 0,
            distance_text: String::new(),
        }
    }
}

impl std::fmt::Display for TravelEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Origin: {}", self.origin_address)?;
        writeln!(f, "Destination: {}", self.destination_address)?;
        writeln!(f, "Duration: {}", self.duration_text)?;
        write!(f, "Distance: {}", self.distance_text)
    }
}

/// The longest wait in a snapshot and where it was reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorstWait {
    pub checkpoint_id: CheckpointId,
    pub created_at: NaiveDateTime,
    pub seconds: u64,
}
