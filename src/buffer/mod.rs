//! Buffer calculation from trip preferences and checkpoint delay

pub mod calculator;

// Re-export commonly used types
pub use calculator::{BufferCalculator, BufferConfig};
