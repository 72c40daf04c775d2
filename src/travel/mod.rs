//! Travel duration from the traveler's origin to the airport

pub mod distance;

// Re-export commonly used types
pub use distance::{DistanceMatrixSource, StaticTravelEstimate, TravelEstimateSource};
