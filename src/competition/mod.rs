//! Competitor storage and standings
//!
//! This module holds the shared competitor store and derives ranked
//! standings from it.

pub mod standings;
pub mod store;

// Re-export commonly used types
pub use standings::{assign_ranks, standings_from_dataset, StandingsCalculator};
pub use store::{CompetitorStore, StoreStats};
