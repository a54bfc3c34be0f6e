//! Combined Events - scoring service for decathlon and heptathlon competitions
//!
//! This crate converts raw athletic performances into points with the IAAF
//! combined-events tables, keeps competitors and their results in memory,
//! ranks them into standings and exchanges datasets as CSV documents.

pub mod api;
pub mod catalog;
pub mod competition;
pub mod config;
pub mod error;
pub mod interchange;
pub mod metrics;
pub mod scoring;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, ScoringError};
pub use types::*;

// Re-export key components
pub use catalog::{EventDefinition, EventProvider, StaticEventCatalog};
pub use competition::{CompetitorStore, StandingsCalculator};
pub use interchange::CsvCodec;
pub use scoring::{IaafPointsCalculator, PointsCalculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
