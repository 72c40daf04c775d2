//! Wait time feed interface and implementations
//!
//! This module defines the feed seam that supplies wait-time snapshots and
//! the implementation that decodes the TSA wait-times JSON payload.

use crate::error::{EstimateError, Result};
use crate::source::{SnapshotSource, SourceRequest};
use crate::types::{FeedSnapshot, Reading, WaitCode};
use crate::utils::{normalize_shortcode, parse_reading_timestamp};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Logical name of the TSA wait-times source
pub const TSA_SOURCE: &str = "tsa-wait-times";

/// Public TSA wait-times endpoint
pub const TSA_WAIT_TIMES_URL: &str = "http://apps.tsa.dhs.gov/MyTSAWebService/GetTSOWaitTimes.ashx";

/// Trait for supplying wait-time snapshots
pub trait WaitTimeFeed: Send + Sync {
    /// Get the current snapshot of readings for an airport
    fn snapshot(&self, shortcode: &str) -> Result<FeedSnapshot>;
}

#[derive(Debug, Deserialize)]
struct TsaPayload {
    #[serde(rename = "WaitTimes", default)]
    wait_times: Vec<TsaWaitTime>,
}

#[derive(Debug, Deserialize)]
struct TsaWaitTime {
    #[serde(rename = "CheckpointIndex")]
    checkpoint_index: TextOrNumber,
    #[serde(rename = "WaitTime")]
    wait_time: TextOrNumber,
    #[serde(rename = "Created_Datetime")]
    created_datetime: String,
}

/// The feed reports numbers either bare or quoted
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl TextOrNumber {
    fn as_text(&self) -> String {
        match self {
            TextOrNumber::Number(n) => n.to_string(),
            TextOrNumber::Text(s) => s.trim().to_string(),
            TextOrNumber::Other(value) => value.to_string(),
        }
    }
}

impl TsaWaitTime {
    /// Convert a feed entry, or explain why it cannot be used
    fn into_reading(self) -> std::result::Result<Reading, String> {
        let wait_text = self.wait_time.as_text();
        let wait_code: WaitCode = wait_text
            .parse()
            .map_err(|_| format!("invalid wait code '{}'", wait_text))?;

        let created_at = parse_reading_timestamp(&self.created_datetime)
            .ok_or_else(|| format!("invalid timestamp '{}'", self.created_datetime))?;

        Ok(Reading::new(self.checkpoint_index.as_text(), wait_code, created_at))
    }
}

/// Decode a TSA wait-times payload, preserving feed order
///
/// Entries with an unreadable wait code or timestamp are skipped. Only a
/// payload that is not valid JSON fails the snapshot.
pub fn parse_tsa_payload(shortcode: &str, raw: &str) -> Result<FeedSnapshot> {
    let payload: TsaPayload = serde_json::from_str(raw)
        .map_err(|e| EstimateError::unavailable(TSA_SOURCE, format!("malformed payload: {}", e)))?;

    let total = payload.wait_times.len();
    let readings: Vec<Reading> = payload
        .wait_times
        .into_iter()
        .filter_map(|entry| match entry.into_reading() {
            Ok(reading) => Some(reading),
            Err(reason) => {
                debug!("Skipping {} wait time entry: {}", shortcode, reason);
                None
            }
        })
        .collect();

    let skipped = total - readings.len();
    if skipped > 0 {
        warn!(
            "Skipped {} of {} malformed wait time entries for {}",
            skipped, total, shortcode
        );
    }

    Ok(FeedSnapshot::new(shortcode, readings))
}

/// Wait-time feed backed by the TSA JSON payload
pub struct TsaWaitTimeFeed<S> {
    source: S,
    url: String,
}

impl<S: SnapshotSource> TsaWaitTimeFeed<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            url: TSA_WAIT_TIMES_URL.to_string(),
        }
    }

    /// Use a different endpoint URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn request(&self, shortcode: &str) -> SourceRequest {
        SourceRequest::new(TSA_SOURCE, self.url.clone(), shortcode)
            .param("ap", shortcode)
            .param("output", "json")
    }
}

impl<S: SnapshotSource> WaitTimeFeed for TsaWaitTimeFeed<S> {
    fn snapshot(&self, shortcode: &str) -> Result<FeedSnapshot> {
        let shortcode = normalize_shortcode(shortcode)?;
        let raw = self.source.fetch(&self.request(&shortcode))?;
        let snapshot = parse_tsa_payload(&shortcode, &raw)?;

        info!(
            "Loaded {} wait time readings for {}",
            snapshot.readings.len(),
            shortcode
        );
        Ok(snapshot)
    }
}

/// Feed serving fixed snapshots (for testing or offline use)
#[derive(Debug, Clone, Default)]
pub struct StaticWaitTimeFeed {
    snapshots: HashMap<String, Vec<Reading>>,
}

impl StaticWaitTimeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register readings for an airport, newest first
    pub fn with_readings(mut self, shortcode: &str, readings: Vec<Reading>) -> Self {
        self.snapshots.insert(shortcode.to_ascii_uppercase(), readings);
        self
    }
}

impl WaitTimeFeed for StaticWaitTimeFeed {
    fn snapshot(&self, shortcode: &str) -> Result<FeedSnapshot> {
        let shortcode = normalize_shortcode(shortcode)?;
        let readings = self.snapshots.get(&shortcode).cloned().ok_or_else(|| {
            EstimateError::unavailable(
                "static wait times",
                format!("no snapshot registered for {}", shortcode),
            )
        })?;

        debug!("Serving {} static readings for {}", readings.len(), shortcode);
        Ok(FeedSnapshot::new(shortcode, readings))
    }
}
