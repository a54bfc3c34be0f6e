//! Event catalog for the supported competition modes
//!
//! This module holds the per-mode event definitions and the registry used
//! to look them up by mode and event id.

pub mod definitions;
pub mod provider;

// Re-export commonly used types
pub use definitions::{EventDefinition, ScoringParams};
pub use provider::{EventProvider, StaticEventCatalog};
