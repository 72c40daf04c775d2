//! Service layer for the estimator
//!
//! This module contains the trip planner that coordinates the collaborators
//! and calculators, and the report rendering for its results.

pub mod app;
pub mod report;

pub use app::{TripEstimate, TripPlanner, TripRequest};
pub use report::{render_report, LeadTimeDisplay};
