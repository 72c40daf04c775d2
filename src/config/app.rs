//! Main application configuration
//!
//! This module defines the configuration structures for the estimator,
//! including TOML file loading, environment variable overrides and validation.

use crate::buffer::BufferConfig;
use crate::trip::DEFAULT_PESSIMISM_FACTOR;
use crate::wait_time::DEFAULT_WINDOW_SIZE;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub data: DataSettings,
    pub estimation: EstimationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where snapshots and metadata come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// JSON airport metadata file
    pub metadata_path: PathBuf,
    /// Directory of recorded source payloads
    pub snapshot_dir: PathBuf,
    /// Response cache file
    pub cache_path: PathBuf,
    /// Consult the response cache before reading snapshots
    pub use_cache: bool,
    /// Credential for the distance-matrix service
    pub distance_api_key: Option<String>,
    /// Unit system for distances (imperial or metric)
    pub distance_units: String,
}

/// Estimation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationSettings {
    /// Number of most-recent readings averaged per checkpoint
    pub window_size: usize,
    /// Multiplier applied to travel time for pessimistic travelers
    pub pessimism_factor: f64,
    /// Fixed buffer contributions
    pub buffer: BufferConfig,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "flight-calc".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from("apcp.json"),
            snapshot_dir: PathBuf::from("snapshots"),
            cache_path: PathBuf::from("cached_results.json"),
            use_cache: true,
            distance_api_key: None,
            distance_units: "imperial".to_string(),
        }
    }
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            pessimism_factor: DEFAULT_PESSIMISM_FACTOR,
            buffer: BufferConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Data settings
        if let Ok(path) = env::var("METADATA_PATH") {
            self.data.metadata_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("SNAPSHOT_DIR") {
            self.data.snapshot_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("CACHE_PATH") {
            self.data.cache_path = PathBuf::from(path);
        }
        if let Ok(use_cache) = env::var("USE_CACHE") {
            self.data.use_cache = use_cache
                .parse()
                .map_err(|_| anyhow!("Invalid USE_CACHE value: {}", use_cache))?;
        }
        if let Ok(key) = env::var("DISTANCE_API_KEY") {
            self.data.distance_api_key = Some(key);
        }
        if let Ok(units) = env::var("DISTANCE_UNITS") {
            self.data.distance_units = units;
        }

        // Estimation settings
        if let Ok(window) = env::var("AVERAGE_WINDOW_SIZE") {
            self.estimation.window_size = window
                .parse()
                .map_err(|_| anyhow!("Invalid AVERAGE_WINDOW_SIZE value: {}", window))?;
        }
        if let Ok(factor) = env::var("PESSIMISM_FACTOR") {
            self.estimation.pessimism_factor = factor
                .parse()
                .map_err(|_| anyhow!("Invalid PESSIMISM_FACTOR value: {}", factor))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate data settings
    if config.data.metadata_path.as_os_str().is_empty() {
        return Err(anyhow!("Metadata path cannot be empty"));
    }
    match config.data.distance_units.as_str() {
        "imperial" | "metric" => {}
        other => return Err(anyhow!("Invalid distance units: {}", other)),
    }

    // Validate estimation settings
    if config.estimation.window_size == 0 {
        return Err(anyhow!("Average window size must be greater than 0"));
    }
    if !config.estimation.pessimism_factor.is_finite() || config.estimation.pessimism_factor < 1.0
    {
        return Err(anyhow!("Pessimism factor must be at least 1.0"));
    }
    config.estimation.buffer.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.estimation.window_size, 5);
        assert_eq!(config.estimation.pessimism_factor, 1.25);
        assert_eq!(config.estimation.buffer.international_seconds, 10800);
        assert!(config.data.use_cache);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.estimation.window_size = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.estimation.pessimism_factor = 0.9;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.data.distance_units = "furlongs".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.estimation.buffer.international_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let raw = r#"
            [data]
            metadata_path = "/srv/flight-calc/apcp.json"
            use_cache = false

            [estimation]
            window_size = 3

            [estimation.buffer]
            checked_bags_seconds = 1200
        "#;

        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.data.metadata_path, PathBuf::from("/srv/flight-calc/apcp.json"));
        assert!(!config.data.use_cache);
        assert_eq!(config.data.distance_units, "imperial");
        assert_eq!(config.estimation.window_size, 3);
        assert_eq!(config.estimation.pessimism_factor, 1.25);
        assert_eq!(config.estimation.buffer.checked_bags_seconds, 1200);
        assert_eq!(config.estimation.buffer.domestic_seconds, 4500);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_from_file_reads_service_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight-calc.toml");
        std::fs::write(&path, "[service]\nname = \"lead-time-desk\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.service.name, "lead-time-desk");
        assert_eq!(AppConfig::default().service.name, "flight-calc");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(AppConfig::from_file(Path::new("/nonexistent/flight-calc.toml")).is_err());
    }
}
