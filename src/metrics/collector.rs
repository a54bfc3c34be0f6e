//! Metrics collection using Prometheus
//!
//! All metrics are registered on a collector-owned registry and exposed in
//! text format through the `/metrics` route.

use crate::competition::StoreStats;
use crate::types::Mode;
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the scoring service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Competitor and score metrics
    competition_metrics: CompetitionMetrics,

    /// Import/export and request metrics
    service_metrics: ServiceMetrics,
}

/// Competitor and score metrics
#[derive(Clone)]
pub struct CompetitionMetrics {
    /// Total competitors registered through the API
    pub competitors_added_total: IntCounter,

    /// Competitors currently held by the store
    pub competitors_registered: IntGauge,

    /// Score entries currently held, by mode
    pub entries_stored: IntGaugeVec,

    /// Scores recorded, by mode
    pub scores_recorded_total: IntCounterVec,

    /// Operations rejected with a typed error, by error kind
    pub rejected_operations_total: IntCounterVec,
}

/// Import/export and request metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// CSV imports, by outcome
    pub imports_total: IntCounterVec,

    /// CSV exports, by mode
    pub exports_total: IntCounterVec,

    /// Standings computations, by mode
    pub standings_requests_total: IntCounterVec,

    /// Operation durations
    pub operation_duration: HistogramVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let competition_metrics = CompetitionMetrics::new(&registry)?;
        let service_metrics = ServiceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            competition_metrics,
            service_metrics,
        })
    }

    /// Get competition metrics
    pub fn competition(&self) -> &CompetitionMetrics {
        &self.competition_metrics
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Update gauges from store counters
    pub fn update_from_store_stats(&self, stats: &StoreStats) {
        self.competition_metrics
            .competitors_registered
            .set(stats.competitors as i64);

        for mode in Mode::ALL {
            let entries = stats.entries_by_mode.get(&mode).copied().unwrap_or(0);
            self.competition_metrics
                .entries_stored
                .with_label_values(&[mode.code()])
                .set(entries as i64);
        }
    }

    /// Record a competitor registration
    pub fn record_competitor_added(&self, duration: Duration) {
        self.competition_metrics.competitors_added_total.inc();
        self.competition_metrics.competitors_registered.inc();
        self.record_operation("add_competitor", duration);
    }

    /// Record an accepted score
    pub fn record_score(&self, mode: Mode, duration: Duration) {
        self.competition_metrics
            .scores_recorded_total
            .with_label_values(&[mode.code()])
            .inc();
        self.record_operation("record_score", duration);
    }

    /// Record an operation rejected with a typed error
    pub fn record_rejection(&self, kind: &str) {
        self.competition_metrics
            .rejected_operations_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Record a standings computation
    pub fn record_standings(&self, mode: Mode, duration: Duration) {
        self.service_metrics
            .standings_requests_total
            .with_label_values(&[mode.code()])
            .inc();
        self.record_operation("standings", duration);
    }

    /// Record a CSV export
    pub fn record_export(&self, mode: Mode, duration: Duration) {
        self.service_metrics
            .exports_total
            .with_label_values(&[mode.code()])
            .inc();
        self.record_operation("export", duration);
    }

    /// Record a CSV import attempt
    pub fn record_import(&self, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "rejected" };

        self.service_metrics
            .imports_total
            .with_label_values(&[outcome])
            .inc();
        self.record_operation("import", duration);
    }

    /// Record an operation duration
    pub fn record_operation(&self, operation: &str, duration: Duration) {
        self.service_metrics
            .operation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Render all metrics in Prometheus text format
    pub fn encode_text(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl CompetitionMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let competitors_added_total = IntCounter::new(
            "combined_events_competitors_added_total",
            "Total competitors registered",
        )?;
        registry.register(Box::new(competitors_added_total.clone()))?;

        let competitors_registered = IntGauge::new(
            "combined_events_competitors_registered",
            "Competitors currently stored",
        )?;
        registry.register(Box::new(competitors_registered.clone()))?;

        let entries_stored = IntGaugeVec::new(
            Opts::new(
                "combined_events_entries_stored",
                "Score entries currently stored",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(entries_stored.clone()))?;

        let scores_recorded_total = IntCounterVec::new(
            Opts::new(
                "combined_events_scores_recorded_total",
                "Total scores recorded",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(scores_recorded_total.clone()))?;

        let rejected_operations_total = IntCounterVec::new(
            Opts::new(
                "combined_events_rejected_operations_total",
                "Operations rejected with an error",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(rejected_operations_total.clone()))?;

        Ok(Self {
            competitors_added_total,
            competitors_registered,
            entries_stored,
            scores_recorded_total,
            rejected_operations_total,
        })
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let imports_total = IntCounterVec::new(
            Opts::new("combined_events_imports_total", "Total CSV imports"),
            &["outcome"],
        )?;
        registry.register(Box::new(imports_total.clone()))?;

        let exports_total = IntCounterVec::new(
            Opts::new("combined_events_exports_total", "Total CSV exports"),
            &["mode"],
        )?;
        registry.register(Box::new(exports_total.clone()))?;

        let standings_requests_total = IntCounterVec::new(
            Opts::new(
                "combined_events_standings_requests_total",
                "Total standings computations",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(standings_requests_total.clone()))?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "combined_events_operation_duration_seconds",
                "Operation duration",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        let health_status = IntGauge::new(
            "combined_events_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        Ok(Self {
            imports_total,
            exports_total,
            standings_requests_total,
            operation_duration,
            health_status,
        })
    }
}
