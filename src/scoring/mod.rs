//! Points calculation for combined events
//!
//! Converts raw performances into points using an event's direction and
//! scoring parameters.

pub mod calculator;

// Re-export commonly used types
pub use calculator::{IaafPointsCalculator, PointsCalculator};
