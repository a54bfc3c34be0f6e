//! Metrics for the combined-events scoring service
//!
//! Prometheus counters, gauges and histograms describing competitors,
//! scores, imports and exports.

pub mod collector;

pub use collector::{CompetitionMetrics, MetricsCollector, MetricsTimer, ServiceMetrics};
