//! Standings calculation
//!
//! Builds ranked standings from one consistent store snapshot. Rows are sorted
//! by total descending; equal totals keep registration order and share a rank
//! under standard competition ranking (1, 2, 2, 4).

use crate::competition::store::CompetitorStore;
use crate::error::Result;
use crate::types::{Dataset, EventPoints, Mode, StandingsRow};
use std::collections::HashMap;
use std::sync::Arc;

/// Derives ranked standings from the competitor store
#[derive(Debug, Clone)]
pub struct StandingsCalculator {
    store: Arc<CompetitorStore>,
}

impl StandingsCalculator {
    /// Create a new standings calculator over a store
    pub fn new(store: Arc<CompetitorStore>) -> Self {
        Self { store }
    }

    /// Compute the ranked standings of a mode
    pub fn compute_standings(&self, mode: Mode) -> Result<Vec<StandingsRow>> {
        let snapshot = self.store.snapshot(mode)?;
        Ok(standings_from_dataset(&snapshot))
    }
}

/// Build ranked standings for every competitor in a dataset
///
/// Competitors without entries are included with a total of zero. Per-event
/// points keep the order of the dataset's entries, which is catalog order for
/// store snapshots and decoded documents.
pub fn standings_from_dataset(dataset: &Dataset) -> Vec<StandingsRow> {
    let mut points_by_competitor: HashMap<_, Vec<EventPoints>> = HashMap::new();
    for entry in dataset
        .entries
        .iter()
        .filter(|entry| entry.mode == dataset.mode)
    {
        let events = points_by_competitor.entry(entry.competitor_id).or_default();
        match events.iter_mut().find(|e| e.event_id == entry.event_id) {
            Some(existing) => existing.points = entry.points,
            None => events.push(EventPoints {
                event_id: entry.event_id.clone(),
                points: entry.points,
            }),
        }
    }

    let mut rows: Vec<StandingsRow> = dataset
        .competitors
        .iter()
        .map(|competitor| {
            let per_event_points = points_by_competitor
                .remove(&competitor.id)
                .unwrap_or_default();
            let total = per_event_points
                .iter()
                .fold(0u32, |sum, event| sum.saturating_add(event.points));

            StandingsRow {
                competitor: competitor.clone(),
                per_event_points,
                total,
                rank: 0,
            }
        })
        .collect();

    // `sort_by` is stable, so ties stay in registration order
    rows.sort_by(|a, b| b.total.cmp(&a.total));

    let totals: Vec<u32> = rows.iter().map(|row| row.total).collect();
    for (row, rank) in rows.iter_mut().zip(assign_ranks(&totals)) {
        row.rank = rank;
    }

    rows
}

/// Assign standard competition ranks to totals already sorted descending
pub fn assign_ranks(sorted_totals: &[u32]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_totals.len());

    for (index, total) in sorted_totals.iter().enumerate() {
        let rank = match index {
            0 => 1,
            _ if sorted_totals[index - 1] == *total => ranks[index - 1],
            _ => index as u32 + 1,
        };
        ranks.push(rank);
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Competitor, ScoreEntry};
    use crate::utils::generate_competitor_id;

    fn competitor(name: &str) -> Competitor {
        Competitor {
            id: generate_competitor_id(),
            name: name.to_string(),
        }
    }

    fn entry(competitor: &Competitor, mode: Mode, event_id: &str, points: u32) -> ScoreEntry {
        ScoreEntry {
            competitor_id: competitor.id,
            mode,
            event_id: event_id.to_string(),
            raw_value: 1.0,
            points,
        }
    }

    #[test]
    fn test_assign_ranks() {
        assert_eq!(assign_ranks(&[50, 50, 30]), vec![1, 1, 3]);
        assert_eq!(assign_ranks(&[90, 70, 70, 10]), vec![1, 2, 2, 4]);
        assert_eq!(assign_ranks(&[5, 5, 5]), vec![1, 1, 1]);
        assert_eq!(assign_ranks(&[3, 2, 1]), vec![1, 2, 3]);
        assert!(assign_ranks(&[]).is_empty());
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let first = competitor("First");
        let second = competitor("Second");
        let third = competitor("Third");

        let dataset = Dataset {
            mode: Mode::Decathlon,
            competitors: vec![first.clone(), second.clone(), third.clone()],
            entries: vec![
                entry(&third, Mode::Decathlon, "100m", 50),
                entry(&first, Mode::Decathlon, "100m", 30),
                entry(&second, Mode::Decathlon, "100m", 50),
            ],
        };

        let rows = standings_from_dataset(&dataset);
        let names: Vec<&str> = rows.iter().map(|r| r.competitor.name.as_str()).collect();
        let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();

        assert_eq!(names, vec!["Second", "Third", "First"]);
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn test_competitor_without_entries_included() {
        let alice = competitor("Alice");
        let bob = competitor("Bob");

        let dataset = Dataset {
            mode: Mode::Decathlon,
            competitors: vec![bob.clone(), alice.clone()],
            entries: vec![
                entry(&alice, Mode::Decathlon, "100m", 861),
                entry(&alice, Mode::Decathlon, "longJump", 862),
            ],
        };

        let rows = standings_from_dataset(&dataset);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].competitor, alice);
        assert_eq!(rows[0].total, 1723);
        let events: Vec<&str> = rows[0]
            .per_event_points
            .iter()
            .map(|e| e.event_id.as_str())
            .collect();
        assert_eq!(events, vec!["100m", "longJump"]);
        assert_eq!(rows[0].rank, 1);

        assert_eq!(rows[1].competitor, bob);
        assert_eq!(rows[1].total, 0);
        assert!(rows[1].per_event_points.is_empty());
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn test_other_mode_entries_ignored() {
        let alice = competitor("Alice");
        let dataset = Dataset {
            mode: Mode::Heptathlon,
            competitors: vec![alice.clone()],
            entries: vec![
                entry(&alice, Mode::Decathlon, "100m", 900),
                entry(&alice, Mode::Heptathlon, "200m", 400),
            ],
        };

        let rows = standings_from_dataset(&dataset);
        assert_eq!(rows[0].total, 400);
        assert_eq!(rows[0].points_for("100m"), None);
        assert_eq!(rows[0].points_for("200m"), Some(400));
    }

    #[test]
    fn test_calculator_reads_store() {
        let store = Arc::new(CompetitorStore::default());
        let alice = store.add_competitor("Alice").unwrap();
        let bob = store.add_competitor("Bob").unwrap();
        store
            .record_score(Mode::Decathlon, bob.id, "100m", 10.9)
            .unwrap();
        store
            .record_score(Mode::Decathlon, alice.id, "100m", 11.4)
            .unwrap();

        let calculator = StandingsCalculator::new(store.clone());
        let rows = calculator.compute_standings(Mode::Decathlon).unwrap();
        assert_eq!(rows[0].competitor.name, "Bob");
        assert_eq!(rows[1].competitor.name, "Alice");

        // Nothing recorded in heptathlon: both tie at zero, registration order
        let rows = calculator.compute_standings(Mode::Heptathlon).unwrap();
        assert_eq!(rows[0].competitor.name, "Alice");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 1);
    }
}
