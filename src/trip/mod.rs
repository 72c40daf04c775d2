//! Trip lead time estimation

pub mod estimator;

// Re-export commonly used types
pub use estimator::{TripEstimator, DEFAULT_PESSIMISM_FACTOR};
