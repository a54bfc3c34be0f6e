//! Concurrency tests for the shared competitor store
//!
//! Many tasks register competitors, record scores and import documents at the
//! same time; readers must only ever observe complete states.

mod fixtures;

use combined_events::competition::StandingsCalculator;
use combined_events::types::Mode;
use std::collections::HashSet;
use std::sync::Arc;

use fixtures::{create_test_state, create_test_store, document_with_names};

#[tokio::test]
async fn test_100_concurrent_registrations() {
    let store = create_test_store();

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || store.add_competitor(format!("athlete_{}", i)))
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    let mut ids = HashSet::new();
    for result in results {
        let competitor = result.unwrap().unwrap();
        assert!(ids.insert(competitor.id), "duplicate competitor id");
    }

    let competitors = store.competitors().unwrap();
    assert_eq!(competitors.len(), 100);
    assert_eq!(
        competitors.iter().map(|c| c.id).collect::<HashSet<_>>(),
        ids
    );
}

#[tokio::test]
async fn test_concurrent_scores_on_distinct_keys() {
    let store = create_test_store();
    let competitors: Vec<_> = (0..20)
        .map(|i| store.add_competitor(format!("athlete_{}", i)).unwrap())
        .collect();

    let events = ["100m", "longJump", "shotPut", "highJump", "400m"];
    let raw_values = [11.2, 690.0, 14.1, 198.0, 50.3];

    let mut handles = Vec::new();
    for competitor in &competitors {
        for (&event_id, raw_value) in events.iter().zip(raw_values) {
            let store = store.clone();
            let competitor_id = competitor.id;
            handles.push(tokio::task::spawn_blocking(move || {
                store.record_score(Mode::Decathlon, competitor_id, event_id, raw_value)
            }));
        }
    }

    let results = futures::future::join_all(handles).await;
    assert!(results.iter().all(|r| matches!(r, Ok(Ok(_)))));

    let entries = store.all_entries(Mode::Decathlon).unwrap();
    assert_eq!(entries.len(), competitors.len() * events.len());

    // All competitors have identical marks, so they all tie for first
    let rows = StandingsCalculator::new(store)
        .compute_standings(Mode::Decathlon)
        .unwrap();
    assert!(rows.iter().all(|row| row.rank == 1));
    assert!(rows.windows(2).all(|pair| pair[0].total == pair[1].total));
}

#[tokio::test]
async fn test_concurrent_upserts_on_one_key() {
    let store = create_test_store();
    let athlete = store.add_competitor("Solo").unwrap();

    let submitted: Vec<f64> = (0..50).map(|i| 10.5 + i as f64 * 0.01).collect();
    let handles: Vec<_> = submitted
        .iter()
        .map(|&raw_value| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || {
                store.record_score(Mode::Decathlon, athlete.id, "100m", raw_value)
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    assert!(results.iter().all(|r| matches!(r, Ok(Ok(_)))));

    let entries = store.all_entries(Mode::Decathlon).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(submitted.contains(&entries[0].raw_value));
}

#[tokio::test]
async fn test_standings_during_imports_see_whole_documents() {
    let state = create_test_state();

    let small = Arc::new(document_with_names(Mode::Heptathlon, &["Ada"]));
    let large = Arc::new(document_with_names(
        Mode::Heptathlon,
        &["Bea", "Cai", "Dov", "Eli"],
    ));
    state.import_csv(&small).unwrap();

    let allowed: Vec<HashSet<String>> = [vec!["Ada"], vec!["Bea", "Cai", "Dov", "Eli"]]
        .iter()
        .map(|names| names.iter().map(|n| n.to_string()).collect())
        .collect();

    let mut importers = Vec::new();
    for i in 0..20 {
        let state = state.clone();
        let document = if i % 2 == 0 { large.clone() } else { small.clone() };
        importers.push(tokio::task::spawn_blocking(move || {
            state.import_csv(&document).map(|_| ())
        }));
    }

    let mut readers = Vec::new();
    for _ in 0..40 {
        let state = state.clone();
        readers.push(tokio::task::spawn_blocking(move || {
            state.standings(Some("HEP")).map(|(_, rows)| {
                rows.into_iter()
                    .map(|row| row.competitor.name)
                    .collect::<HashSet<String>>()
            })
        }));
    }

    let import_results = futures::future::join_all(importers).await;
    assert!(import_results.iter().all(|r| matches!(r, Ok(Ok(())))));

    for result in futures::future::join_all(readers).await {
        let names = result.unwrap().unwrap();
        assert!(
            allowed.contains(&names),
            "observed a partial import: {:?}",
            names
        );
    }
}

#[tokio::test]
async fn test_rejected_import_under_load_changes_nothing() {
    let state = create_test_state();
    let alice = state.add_competitor("Alice").unwrap();
    state.record_score("DEC", alice.id, "100m", 11.0).unwrap();

    let broken = "MODE,DEC\nname,100m\nMallory,10\n";
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let state = state.clone();
            tokio::task::spawn_blocking(move || state.import_csv(broken))
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap().unwrap_err().kind(), "UnknownEvent");
    }

    let (_, rows) = state.standings(Some("DEC")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total, 861);
}
