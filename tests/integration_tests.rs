//! Integration tests for the combined-events scoring service
//!
//! These tests exercise the store, standings and CSV codec together:
//! - Recording scores and deriving standings
//! - Mode isolation
//! - Export/import round trips
//! - Atomic rejection of bad imports

mod fixtures;

use combined_events::catalog::{EventDefinition, StaticEventCatalog};
use combined_events::competition::StandingsCalculator;
use combined_events::interchange::CsvCodec;
use combined_events::scoring::IaafPointsCalculator;
use combined_events::types::Mode;
use combined_events::{CompetitorStore, ScoringError};
use std::sync::Arc;

use fixtures::{header_row, scenario_store, CountingCalculator};

fn create_codec() -> CsvCodec {
    CsvCodec::new(
        Arc::new(StaticEventCatalog::new()),
        Arc::new(IaafPointsCalculator::new()),
    )
}

#[test]
fn test_scenario_standings() {
    let (store, alice, bob) = scenario_store();
    let standings = StandingsCalculator::new(store.clone());

    let rows = standings.compute_standings(Mode::Decathlon).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].competitor, alice);
    assert_eq!(rows[0].points_for("100m"), Some(861));
    assert_eq!(rows[0].points_for("longJump"), Some(862));
    assert_eq!(rows[0].total, 1723);
    assert_eq!(rows[0].rank, 1);

    assert_eq!(rows[1].competitor, bob);
    assert_eq!(rows[1].total, 0);
    assert!(rows[1].per_event_points.is_empty());
    assert_eq!(rows[1].rank, 2);
}

#[test]
fn test_scenario_export_document() {
    let (store, _, _) = scenario_store();
    let codec = create_codec();

    let document = codec
        .encode(&store.snapshot(Mode::Decathlon).unwrap())
        .unwrap();

    let expected = format!(
        "MODE,DEC\n{}\nAlice,11,720,,,,,,,,\nBob,,,,,,,,,,\n",
        header_row(Mode::Decathlon)
    );
    assert_eq!(document, expected);
}

#[test]
fn test_rerecording_replaces_previous_value() {
    let (store, alice, _) = scenario_store();

    let points = store
        .record_score(Mode::Decathlon, alice.id, "100m", 10.395)
        .unwrap();
    assert_eq!(points, 1000);

    let entries = store.all_entries(Mode::Decathlon).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].event_id, "100m");
    assert_eq!(entries[0].raw_value, 10.395);

    let rows = StandingsCalculator::new(store)
        .compute_standings(Mode::Decathlon)
        .unwrap();
    assert_eq!(rows[0].total, 1862);
}

#[test]
fn test_modes_are_isolated() {
    let (store, alice, bob) = scenario_store();
    store
        .record_score(Mode::Heptathlon, bob.id, "200m", 23.8)
        .unwrap();

    let standings = StandingsCalculator::new(store.clone());
    let heptathlon = standings.compute_standings(Mode::Heptathlon).unwrap();
    assert_eq!(heptathlon[0].competitor, bob);
    assert_eq!(heptathlon[1].competitor, alice);
    assert_eq!(heptathlon[1].total, 0);

    let decathlon = standings.compute_standings(Mode::Decathlon).unwrap();
    assert_eq!(decathlon[0].total, 1723);
    assert_eq!(decathlon[1].total, 0);

    // Event ids are resolved per mode
    let err = store
        .record_score(Mode::Heptathlon, alice.id, "100m", 11.0)
        .unwrap_err();
    assert_eq!(err.kind(), "UnknownEvent");
}

#[test]
fn test_export_import_round_trip_preserves_standings() {
    let (store, _, _) = scenario_store();
    let codec = create_codec();

    let before = StandingsCalculator::new(store.clone())
        .compute_standings(Mode::Decathlon)
        .unwrap();
    let document = codec
        .encode(&store.snapshot(Mode::Decathlon).unwrap())
        .unwrap();

    let fresh = Arc::new(CompetitorStore::default());
    fresh.replace_all(codec.decode(&document).unwrap()).unwrap();

    let after = StandingsCalculator::new(fresh.clone())
        .compute_standings(Mode::Decathlon)
        .unwrap();

    let summarize = |rows: &[combined_events::StandingsRow]| {
        rows.iter()
            .map(|row| {
                (
                    row.competitor.name.clone(),
                    row.per_event_points.clone(),
                    row.total,
                    row.rank,
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(summarize(&before), summarize(&after));

    // Re-exporting the imported data reproduces the document
    let again = codec
        .encode(&fresh.snapshot(Mode::Decathlon).unwrap())
        .unwrap();
    assert_eq!(again, document);
}

#[test]
fn test_import_with_unknown_header_keeps_state() {
    let (store, alice, bob) = scenario_store();
    let codec = create_codec();

    let document = "MODE,DEC\nname,100m,longJump,sprint\nMallory,10.0,700,9\n";
    let err = codec
        .decode(document)
        .and_then(|dataset| store.replace_all(dataset))
        .unwrap_err();
    assert_eq!(
        err,
        ScoringError::UnknownEvent {
            mode: "DEC".to_string(),
            event_id: "sprint".to_string()
        }
    );

    assert_eq!(store.competitors().unwrap(), vec![alice, bob]);
    assert_eq!(store.all_entries(Mode::Decathlon).unwrap().len(), 2);
}

#[test]
fn test_import_replaces_every_mode() {
    let (store, _, bob) = scenario_store();
    store
        .record_score(Mode::Heptathlon, bob.id, "800m", 128.0)
        .unwrap();

    let codec = create_codec();
    let document = format!(
        "MODE,HEP\n{}\nZoe,13.5,,,,,,\n",
        header_row(Mode::Heptathlon)
    );
    store.replace_all(codec.decode(&document).unwrap()).unwrap();

    let names: Vec<String> = store
        .competitors()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Zoe"]);
    assert!(store.all_entries(Mode::Decathlon).unwrap().is_empty());
    assert_eq!(store.all_entries(Mode::Heptathlon).unwrap().len(), 1);
}

#[test]
fn test_import_recomputes_points() {
    let calculator = Arc::new(CountingCalculator::new());
    let codec = CsvCodec::new(Arc::new(StaticEventCatalog::new()), calculator.clone());

    let document = format!(
        "MODE,DEC\n{}\nAnn,10.395,,18.4,,,,,,,\nBen,,,,,,,,,,\n",
        header_row(Mode::Decathlon)
    );
    let dataset = codec.decode(&document).unwrap();

    assert_eq!(calculator.calls(), 2);
    let points: Vec<u32> = dataset.entries.iter().map(|e| e.points).collect();
    assert_eq!(points, vec![1000, 1000]);
}

#[test]
fn test_custom_catalog_drives_header() {
    let sprint = EventDefinition::track("60m", "60 metres", 58.015, 11.5, 1.81);
    let catalog = StaticEventCatalog::with_events(
        vec![sprint.clone()],
        vec![EventDefinition::field("highJump", "High jump", "cm", 1.84523, 75.0, 1.348)],
    )
    .unwrap();

    let store = CompetitorStore::new(
        Arc::new(catalog.clone()),
        Arc::new(IaafPointsCalculator::new()),
    );
    let runner = store.add_competitor("Runner").unwrap();
    store
        .record_score(Mode::Decathlon, runner.id, "60m", 7.0)
        .unwrap();

    let codec = CsvCodec::new(Arc::new(catalog), Arc::new(IaafPointsCalculator::new()));
    let document = codec
        .encode(&store.snapshot(Mode::Decathlon).unwrap())
        .unwrap();
    assert_eq!(document, "MODE,DEC\nname,60m\nRunner,7\n");
}

#[test]
fn test_duplicate_names_are_distinct_competitors() {
    let store = CompetitorStore::default();
    let first = store.add_competitor("Sam").unwrap();
    let second = store.add_competitor("Sam").unwrap();
    assert_ne!(first.id, second.id);

    store
        .record_score(Mode::Decathlon, second.id, "400m", 48.0)
        .unwrap();

    let codec = create_codec();
    let dataset = codec
        .decode(
            &codec
                .encode(&store.snapshot(Mode::Decathlon).unwrap())
                .unwrap(),
        )
        .unwrap();

    assert_eq!(dataset.competitors.len(), 2);
    assert_eq!(dataset.entries.len(), 1);
    assert_eq!(dataset.entries[0].competitor_id, dataset.competitors[1].id);
}
