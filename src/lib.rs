//! flight-calc - estimates when to leave for the airport
//!
//! This crate combines airport checkpoint metadata, a snapshot of security
//! checkpoint wait times, and a travel duration into a recommended buffer
//! and a total lead time.

pub mod buffer;
pub mod config;
pub mod error;
pub mod metadata;
pub mod service;
pub mod source;
pub mod travel;
pub mod trip;
pub mod types;
pub mod utils;
pub mod wait_time;

// Re-export commonly used types and traits
pub use error::{EstimateError, Result};
pub use types::*;

// Re-export key components
pub use buffer::BufferCalculator;
pub use service::{TripEstimate, TripPlanner, TripRequest};
pub use trip::TripEstimator;
pub use wait_time::CheckpointAggregator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
