//! Error types for the lead-time estimator
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Callers that need to react to a specific failure
//! recover it with `downcast_ref::<EstimateError>()`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific estimation scenarios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    #[error("Insufficient data: no readings available for {context}")]
    InsufficientData { context: String },

    #[error("Unknown checkpoint: {checkpoint_id} is not listed for airport {shortcode}")]
    UnknownCheckpoint {
        shortcode: String,
        checkpoint_id: String,
    },

    #[error("Unknown airport: {shortcode}")]
    UnknownAirport { shortcode: String },

    #[error("Airport {shortcode} has no checkpoints in its metadata")]
    EmptyCheckpointList { shortcode: String },

    #[error("Data unavailable from {source_name}: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    #[error("Invalid airport shortcode '{shortcode}': must be 3 letters")]
    InvalidShortcode { shortcode: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl EstimateError {
    /// Build a `DataUnavailable` error for a named collaborator
    pub fn unavailable(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
