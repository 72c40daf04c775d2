//! Airport metadata store interface and implementations

use crate::error::{EstimateError, Result};
use crate::types::Airport;
use crate::utils::normalize_shortcode;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Trait for looking up static airport metadata
pub trait MetadataStore: Send + Sync {
    /// Get an airport by shortcode (case-insensitive)
    fn airport(&self, shortcode: &str) -> Result<Airport>;

    /// All known shortcodes, sorted
    fn shortcodes(&self) -> Vec<String>;
}

/// Metadata held in memory, keyed by upper-case shortcode
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataStore {
    airports: BTreeMap<String, Airport>,
}

impl InMemoryMetadataStore {
    /// Build a store from a list of airports
    ///
    /// A later entry with the same shortcode replaces an earlier one.
    pub fn from_airports(airports: Vec<Airport>) -> Self {
        let mut store = Self::default();
        for airport in airports {
            let key = airport.shortcode.to_ascii_uppercase();
            if store.airports.insert(key, airport).is_some() {
                warn!("Duplicate airport entry in metadata; keeping the last one");
            }
        }
        store
    }

    /// Parse a JSON array of airports
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let airports: Vec<Airport> = serde_json::from_str(raw)
            .map_err(|e| EstimateError::unavailable("airport metadata", e))?;
        Ok(Self::from_airports(airports))
    }

    /// Load a JSON array of airports from disk
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EstimateError::unavailable(
                "airport metadata",
                format!("could not read {}: {}", path.display(), e),
            )
        })?;

        let store = Self::from_json_str(&raw)?;
        info!(
            "Loaded metadata for {} airports from {}",
            store.airports.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn airport(&self, shortcode: &str) -> Result<Airport> {
        let key = normalize_shortcode(shortcode)?;
        self.airports.get(&key).cloned().ok_or_else(|| {
            EstimateError::UnknownAirport {
                shortcode: key.clone(),
            }
            .into()
        })
    }

    fn shortcodes(&self) -> Vec<String> {
        self.airports.keys().cloned().collect()
    }
}
