//! Checkpoint wait time feed and statistics
//!
//! This module handles retrieval of wait-time snapshots and the per-checkpoint
//! aggregation used to size the security checkpoint delay.

pub mod provider;
pub mod statistics;

// Re-export commonly used types
pub use provider::{StaticWaitTimeFeed, TsaWaitTimeFeed, WaitTimeFeed};
pub use statistics::{CheckpointAggregator, CheckpointSummary, DEFAULT_WINDOW_SIZE};
