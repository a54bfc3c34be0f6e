//! Main application state and service coordination
//!
//! `AppState` wires the event catalog, the points calculator, the competitor
//! store, the standings calculator and the CSV codec together, and wraps
//! every public operation with logging and metrics.

use crate::catalog::{EventDefinition, EventProvider, StaticEventCatalog};
use crate::competition::{CompetitorStore, StandingsCalculator, StoreStats};
use crate::config::AppConfig;
use crate::error::{Result as ScoringResult, ScoringError};
use crate::interchange::CsvCodec;
use crate::metrics::MetricsCollector;
use crate::scoring::{IaafPointsCalculator, PointsCalculator};
use crate::types::{Competitor, CompetitorId, Mode, StandingsRow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

/// Interval of the background task refreshing store gauges
const METRICS_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Outcome of a successful CSV import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub mode: Mode,
    pub competitors: usize,
    pub entries: usize,
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Event definitions per mode
    catalog: Arc<dyn EventProvider>,

    /// Shared competitor and score storage
    store: Arc<CompetitorStore>,

    /// Standings derived from the store
    standings: StandingsCalculator,

    /// CSV export/import
    codec: CsvCodec,

    /// Metrics collector
    metrics: Arc<MetricsCollector>,

    /// Background task handles
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with the built-in catalog and IAAF scoring
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        Self::with_components(
            config,
            Arc::new(StaticEventCatalog::new()),
            Arc::new(IaafPointsCalculator::new()),
        )
    }

    /// Initialize the application with a custom catalog and calculator
    pub fn with_components(
        config: AppConfig,
        catalog: Arc<dyn EventProvider>,
        calculator: Arc<dyn PointsCalculator>,
    ) -> Result<Self, ServiceError> {
        info!("Initializing combined-events scoring service");
        info!(
            "Configuration: service={}, default_mode={}",
            config.service.name, config.competition.default_mode
        );

        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let metrics = Arc::new(MetricsCollector::new().map_err(|e| {
            ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            }
        })?);

        let store = Arc::new(CompetitorStore::new(catalog.clone(), calculator.clone()));
        let standings = StandingsCalculator::new(store.clone());
        let codec = CsvCodec::new(catalog.clone(), calculator);

        Ok(Self {
            config,
            catalog,
            store,
            standings,
            codec,
            metrics,
            background_tasks: Mutex::new(Vec::new()),
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Start background tasks and mark the service as running
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("Starting combined-events scoring service");

        *self.is_running.write().await = true;
        self.start_background_tasks().await;

        info!("✅ Combined-events scoring service started successfully");
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of combined-events service");

        *self.is_running.write().await = false;
        self.stop_background_tasks().await;

        let final_stats = self
            .store
            .stats()
            .map_err(|e| ServiceError::BackgroundTask {
                message: format!("Failed to get final stats: {}", e),
            })?;

        info!("Final service statistics: {:?}", final_stats);
        info!("✅ Combined-events service shutdown completed");

        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get the event catalog
    pub fn catalog(&self) -> Arc<dyn EventProvider> {
        self.catalog.clone()
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Current store counters
    pub fn store_stats(&self) -> ScoringResult<StoreStats> {
        self.store.stats()
    }

    /// Resolve an optional mode parameter, falling back to the configured default
    pub fn resolve_mode(&self, mode: Option<&str>) -> ScoringResult<Mode> {
        match mode {
            Some(code) => self.observe("resolve_mode", code.parse()),
            None => Ok(self.config.competition.default_mode),
        }
    }

    /// Event definitions of a mode in catalog order
    pub fn list_events(&self, mode: Option<&str>) -> ScoringResult<(Mode, Vec<EventDefinition>)> {
        let mode = self.resolve_mode(mode)?;
        Ok((mode, self.catalog.events_for_mode(mode).to_vec()))
    }

    /// Register a competitor
    pub fn add_competitor(&self, name: &str) -> ScoringResult<Competitor> {
        let timer = self.metrics.start_timer();
        let competitor = self.observe("add_competitor", self.store.add_competitor(name))?;

        self.metrics.record_competitor_added(timer.stop());
        info!(
            "Registered competitor '{}' ({})",
            competitor.name, competitor.id
        );
        Ok(competitor)
    }

    /// All competitors in registration order
    pub fn competitors(&self) -> ScoringResult<Vec<Competitor>> {
        self.observe("list_competitors", self.store.competitors())
    }

    /// Look up a registered competitor
    pub fn competitor(&self, competitor_id: CompetitorId) -> ScoringResult<Competitor> {
        let found = self.store.competitor(competitor_id).and_then(|competitor| {
            competitor.ok_or_else(|| ScoringError::UnknownCompetitor {
                competitor_id: competitor_id.to_string(),
            })
        });
        self.observe("get_competitor", found)
    }

    /// Record a raw performance and return the points awarded
    pub fn record_score(
        &self,
        mode: &str,
        competitor_id: CompetitorId,
        event_id: &str,
        raw_value: f64,
    ) -> ScoringResult<u32> {
        let timer = self.metrics.start_timer();
        let mode = self.observe("record_score", mode.parse::<Mode>())?;
        let points = self.observe(
            "record_score",
            self.store
                .record_score(mode, competitor_id, event_id, raw_value),
        )?;

        self.metrics.record_score(mode, timer.stop());
        info!(
            "Recorded {} {} = {} for {} -> {} points",
            mode, event_id, raw_value, competitor_id, points
        );
        Ok(points)
    }

    /// Ranked standings of a mode
    pub fn standings(&self, mode: Option<&str>) -> ScoringResult<(Mode, Vec<StandingsRow>)> {
        let timer = self.metrics.start_timer();
        let mode = self.resolve_mode(mode)?;
        let rows = self.observe("standings", self.standings.compute_standings(mode))?;

        self.metrics.record_standings(mode, timer.stop());
        debug!("Computed {} standings rows for {}", rows.len(), mode);
        Ok((mode, rows))
    }

    /// Export a mode's dataset as a CSV document
    pub fn export_csv(&self, mode: Option<&str>) -> ScoringResult<(Mode, String)> {
        let timer = self.metrics.start_timer();
        let mode = self.resolve_mode(mode)?;
        let snapshot = self.observe("export", self.store.snapshot(mode))?;
        let document = self.observe("export", self.codec.encode(&snapshot))?;

        self.metrics.record_export(mode, timer.stop());
        info!(
            "Exported {} competitors and {} entries for {}",
            snapshot.competitors.len(),
            snapshot.entries.len(),
            mode
        );
        Ok((mode, document))
    }

    /// Replace the stored dataset with the content of a CSV document
    ///
    /// Either the whole document is installed or nothing changes.
    pub fn import_csv(&self, document: &str) -> ScoringResult<ImportSummary> {
        let timer = self.metrics.start_timer();

        let result = self.codec.decode(document).and_then(|dataset| {
            let summary = ImportSummary {
                mode: dataset.mode,
                competitors: dataset.competitors.len(),
                entries: dataset.entries.len(),
            };
            self.store.replace_all(dataset)?;
            Ok(summary)
        });

        self.metrics.record_import(result.is_ok(), timer.stop());
        let summary = self.observe("import", result)?;

        if let Ok(stats) = self.store.stats() {
            self.metrics.update_from_store_stats(&stats);
        }
        info!(
            "Imported {} competitors and {} entries for {}",
            summary.competitors, summary.entries, summary.mode
        );
        Ok(summary)
    }

    /// Log and count a rejected operation
    fn observe<T>(&self, operation: &str, result: ScoringResult<T>) -> ScoringResult<T> {
        if let Err(e) = &result {
            self.metrics.record_rejection(e.kind());
            match e {
                ScoringError::Internal { .. } | ScoringError::Configuration { .. } => {
                    tracing::error!("{} failed: {}", operation, e)
                }
                _ => warn!("{} rejected: {}", operation, e),
            }
        }
        result
    }

    /// Start background maintenance tasks
    async fn start_background_tasks(&self) {
        info!(
            "Starting store metrics task ({}s interval)...",
            METRICS_REFRESH_INTERVAL.as_secs()
        );

        let metrics_task = {
            let store = self.store.clone();
            let metrics = self.metrics.clone();
            let is_running = self.is_running.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(METRICS_REFRESH_INTERVAL);
                info!("Store metrics task started");

                while *is_running.read().await {
                    interval.tick().await;

                    match store.stats() {
                        Ok(stats) => {
                            debug!(
                                "Updating metrics - competitors: {}, entries: {:?}",
                                stats.competitors, stats.entries_by_mode
                            );
                            metrics.update_from_store_stats(&stats);
                            metrics.update_health_status(2);
                        }
                        Err(e) => {
                            warn!("Failed to get store stats for metrics update: {}", e);
                            metrics.update_health_status(0);
                        }
                    }
                }

                info!("Store metrics task stopped");
            })
        };

        self.background_tasks.lock().await.push(metrics_task);
    }

    /// Stop all background tasks
    async fn stop_background_tasks(&self) {
        let mut tasks = self.background_tasks.lock().await;
        let task_count = tasks.len();
        if task_count == 0 {
            info!("No background tasks to stop");
            return;
        }

        info!("Stopping {} background tasks...", task_count);
        for (i, task) in tasks.drain(..).enumerate() {
            debug!("Aborting background task {}/{}", i + 1, task_count);
            task.abort();
        }

        info!("✅ All {} background tasks stopped", task_count);
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
