//! Service layer for the combined-events scoring service
//!
//! This module contains the application state, operation facade and health
//! reporting used by the HTTP API and the binary.

pub mod app;
pub mod health;

pub use app::{AppState, ImportSummary, ServiceError};
pub use health::{HealthCheck, HealthStatus};
