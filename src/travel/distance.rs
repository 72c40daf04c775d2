//! Travel estimate providers
//!
//! `DistanceMatrixSource` decodes a distance-matrix style JSON response for
//! a single origin/destination pair. Any status other than `OK`, or a
//! response without a duration, is reported as unavailable data rather
//! than a zero-length trip.

use crate::error::{EstimateError, Result};
use crate::source::{SnapshotSource, SourceRequest};
use crate::types::TravelEstimate;
use serde::Deserialize;
use tracing::info;

/// Logical name of the distance-matrix source
pub const DISTANCE_SOURCE: &str = "distance-matrix";

/// Public distance-matrix endpoint
pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Trait for estimating travel from an origin to an airport
pub trait TravelEstimateSource: Send + Sync {
    fn estimate(&self, origin: &str, destination: &str) -> Result<TravelEstimate>;
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    origin_addresses: Vec<String>,
    #[serde(default)]
    destination_addresses: Vec<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<TextValue>,
    distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

/// Decode a distance-matrix response for one origin/destination pair
pub fn parse_distance_matrix(origin: &str, destination: &str, raw: &str) -> Result<TravelEstimate> {
    let unavailable = |reason: String| {
        EstimateError::unavailable(
            DISTANCE_SOURCE,
            format!("{} (origin '{}', destination '{}')", reason, origin, destination),
        )
    };

    let response: MatrixResponse = serde_json::from_str(raw)
        .map_err(|e| unavailable(format!("malformed response: {}", e)))?;

    if response.status != "OK" {
        return Err(unavailable(format!("request status {}", response.status)).into());
    }

    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| unavailable("response contained no route".to_string()))?;

    if element.status != "OK" {
        return Err(unavailable(format!("route status {}", element.status)).into());
    }

    let duration = element
        .duration
        .ok_or_else(|| unavailable("route has no duration".to_string()))?;
    let distance = element.distance.unwrap_or(TextValue {
        text: String::new(),
        value: 0,
    });

    Ok(TravelEstimate {
        origin_address: response
            .origin_addresses
            .into_iter()
            .next()
            .unwrap_or_else(|| origin.to_string()),
        destination_address: response
            .destination_addresses
            .into_iter()
            .next()
            .unwrap_or_else(|| destination.to_string()),
        duration_seconds: duration.value,
        duration_text: duration.text,
        distance_meters: distance.value,
        distance_text: distance.text,
    })
}

/// Travel estimates from a distance-matrix style service
pub struct DistanceMatrixSource<S> {
    source: S,
    url: String,
    api_key: Option<String>,
    units: String,
}

impl<S: SnapshotSource> DistanceMatrixSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            url: DISTANCE_MATRIX_URL.to_string(),
            api_key: None,
            units: "imperial".to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn request(&self, origin: &str, destination: &str) -> SourceRequest {
        let request = SourceRequest::new(
            DISTANCE_SOURCE,
            self.url.clone(),
            format!("{} to {}", origin, destination),
        )
        .param("units", self.units.clone())
        .param("origins", origin)
        .param("destinations", destination);

        match &self.api_key {
            Some(key) => request.param("key", key.clone()),
            None => request,
        }
    }
}

impl<S: SnapshotSource> TravelEstimateSource for DistanceMatrixSource<S> {
    fn estimate(&self, origin: &str, destination: &str) -> Result<TravelEstimate> {
        let raw = self.source.fetch(&self.request(origin, destination))?;
        let estimate = parse_distance_matrix(origin, destination, &raw)?;

        info!(
            "Travel from {} to {}: {} ({}s)",
            estimate.origin_address,
            estimate.destination_address,
            estimate.duration_text,
            estimate.duration_seconds
        );
        Ok(estimate)
    }
}

/// Returns the same estimate for every trip (for testing or offline use)
#[derive(Debug, Clone)]
pub struct StaticTravelEstimate {
    estimate: TravelEstimate,
}

impl StaticTravelEstimate {
    pub fn new(estimate: TravelEstimate) -> Self {
        Self { estimate }
    }

    pub fn from_duration(duration_seconds: u64) -> Self {
        Self::new(TravelEstimate::from_duration(duration_seconds))
    }
}

impl TravelEstimateSource for StaticTravelEstimate {
    fn estimate(&self, origin: &str, destination: &str) -> Result<TravelEstimate> {
        let mut estimate = self.estimate.clone();
        if estimate.origin_address.is_empty() {
            estimate.origin_address = origin.to_string();
        }
        if estimate.destination_address.is_empty() {
            estimate.destination_address = destination.to_string();
        }
        Ok(estimate)
    }
}
