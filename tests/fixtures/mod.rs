//! Test fixtures shared by the integration test suites

#![allow(dead_code)]

use combined_events::catalog::{EventDefinition, EventProvider, StaticEventCatalog};
use combined_events::config::AppConfig;
use combined_events::error::Result;
use combined_events::scoring::{IaafPointsCalculator, PointsCalculator};
use combined_events::service::AppState;
use combined_events::types::{Competitor, Mode};
use combined_events::CompetitorStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Points calculator that counts how often it is consulted
#[derive(Debug, Default)]
pub struct CountingCalculator {
    inner: IaafPointsCalculator,
    calls: AtomicUsize,
}

impl CountingCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `points_for` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PointsCalculator for CountingCalculator {
    fn points_for(&self, event: &EventDefinition, raw_value: f64) -> Result<u32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.points_for(event, raw_value)
    }
}

/// Store with the standard catalog and IAAF scoring
pub fn create_test_store() -> Arc<CompetitorStore> {
    Arc::new(CompetitorStore::default())
}

/// Application state with default configuration
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::new(AppConfig::default()).expect("Failed to create app state"))
}

/// Application state with a custom configuration
pub fn create_test_state_with(config: AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config).expect("Failed to create app state"))
}

/// Alice with 100m = 11.0 s and long jump = 720 cm, Bob with nothing
pub fn scenario_store() -> (Arc<CompetitorStore>, Competitor, Competitor) {
    let store = create_test_store();
    let alice = store.add_competitor("Alice").unwrap();
    let bob = store.add_competitor("Bob").unwrap();

    store
        .record_score(Mode::Decathlon, alice.id, "100m", 11.0)
        .unwrap();
    store
        .record_score(Mode::Decathlon, alice.id, "longJump", 720.0)
        .unwrap();

    (store, alice, bob)
}

/// CSV header row of a mode for the standard catalog
pub fn header_row(mode: Mode) -> String {
    let catalog = StaticEventCatalog::new();
    let ids: Vec<&str> = catalog
        .events_for_mode(mode)
        .iter()
        .map(|event| event.id.as_str())
        .collect();
    format!("name,{}", ids.join(","))
}

/// A CSV document with one empty row per competitor name
pub fn document_with_names(mode: Mode, names: &[&str]) -> String {
    let event_count = StaticEventCatalog::new().events_for_mode(mode).len();
    let empty_cells = ",".repeat(event_count);

    let mut document = format!("MODE,{}\n{}\n", mode, header_row(mode));
    for name in names {
        document.push_str(name);
        document.push_str(&empty_cells);
        document.push('\n');
    }
    document
}
