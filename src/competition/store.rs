//! In-memory competitor and score storage
//!
//! All state lives behind a single `RwLock`: mutations take the write lock,
//! snapshots take the read lock, and a bulk import swaps the whole state in
//! one assignment so readers never observe a partially installed dataset.

use crate::catalog::{EventProvider, StaticEventCatalog};
use crate::error::{Result, ScoringError};
use crate::scoring::{IaafPointsCalculator, PointsCalculator};
use crate::types::{Competitor, CompetitorId, Dataset, Mode, ScoreEntry, ScoreKey};
use crate::utils::generate_competitor_id;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Counters describing the stored dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of registered competitors
    pub competitors: usize,
    /// Number of entries recorded per mode
    pub entries_by_mode: HashMap<Mode, usize>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Competitors in registration order
    competitors: Vec<Competitor>,
    /// Competitor id to position in `competitors`
    positions: HashMap<CompetitorId, usize>,
    entries: HashMap<ScoreKey, ScoreEntry>,
}

impl StoreState {
    fn from_dataset(dataset: Dataset) -> Self {
        let positions = dataset
            .competitors
            .iter()
            .enumerate()
            .map(|(position, competitor)| (competitor.id, position))
            .collect();
        let entries = dataset
            .entries
            .into_iter()
            .map(|entry| (ScoreKey::from(&entry), entry))
            .collect();

        Self {
            competitors: dataset.competitors,
            positions,
            entries,
        }
    }
}

/// Shared store of competitors and their recorded performances
pub struct CompetitorStore {
    state: RwLock<StoreState>,
    catalog: Arc<dyn EventProvider>,
    calculator: Arc<dyn PointsCalculator>,
}

impl CompetitorStore {
    /// Create a new store using the given catalog and points calculator
    pub fn new(catalog: Arc<dyn EventProvider>, calculator: Arc<dyn PointsCalculator>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            catalog,
            calculator,
        }
    }

    /// Register a competitor under a fresh id
    ///
    /// Names are stored verbatim and need not be unique.
    pub fn add_competitor(&self, name: impl Into<String>) -> Result<Competitor> {
        let competitor = Competitor {
            id: generate_competitor_id(),
            name: name.into(),
        };

        let mut state = self.write_state()?;
        let position = state.competitors.len();
        state.positions.insert(competitor.id, position);
        state.competitors.push(competitor.clone());

        Ok(competitor)
    }

    /// Record a raw performance and return the points awarded
    ///
    /// A later save for the same (competitor, mode, event) replaces the
    /// earlier one.
    pub fn record_score(
        &self,
        mode: Mode,
        competitor_id: CompetitorId,
        event_id: &str,
        raw_value: f64,
    ) -> Result<u32> {
        let mut state = self.write_state()?;

        if !state.positions.contains_key(&competitor_id) {
            return Err(ScoringError::UnknownCompetitor {
                competitor_id: competitor_id.to_string(),
            });
        }

        let event = self.catalog.lookup(mode, event_id)?;
        let points = self.calculator.points_for(event, raw_value)?;

        let entry = ScoreEntry {
            competitor_id,
            mode,
            event_id: event.id.clone(),
            raw_value,
            points,
        };
        state.entries.insert(ScoreKey::from(&entry), entry);

        Ok(points)
    }

    /// Get all competitors in registration order
    pub fn competitors(&self) -> Result<Vec<Competitor>> {
        let state = self.read_state()?;
        Ok(state.competitors.clone())
    }

    /// Get a single competitor
    pub fn competitor(&self, competitor_id: CompetitorId) -> Result<Option<Competitor>> {
        let state = self.read_state()?;
        Ok(state
            .positions
            .get(&competitor_id)
            .and_then(|&position| state.competitors.get(position))
            .cloned())
    }

    /// Get the entries of a mode, by registration order then catalog order
    pub fn all_entries(&self, mode: Mode) -> Result<Vec<ScoreEntry>> {
        let state = self.read_state()?;
        Ok(self.ordered_entries(&state, mode))
    }

    /// Take a consistent copy of the competitors and one mode's entries
    pub fn snapshot(&self, mode: Mode) -> Result<Dataset> {
        let state = self.read_state()?;
        Ok(Dataset {
            mode,
            competitors: state.competitors.clone(),
            entries: self.ordered_entries(&state, mode),
        })
    }

    /// Atomically replace the whole store with a decoded dataset
    ///
    /// The dataset is validated and rescored before the write lock is taken;
    /// on error the current state is left untouched. Entries recorded under
    /// other modes are discarded together with the competitors they belong to.
    pub fn replace_all(&self, dataset: Dataset) -> Result<()> {
        let dataset = self.validate_dataset(dataset)?;
        let replacement = StoreState::from_dataset(dataset);

        let mut state = self.write_state()?;
        *state = replacement;

        Ok(())
    }

    /// Get counters for health reporting
    pub fn stats(&self) -> Result<StoreStats> {
        let state = self.read_state()?;

        let mut entries_by_mode: HashMap<Mode, usize> =
            Mode::ALL.iter().map(|&mode| (mode, 0)).collect();
        for key in state.entries.keys() {
            *entries_by_mode.entry(key.mode).or_insert(0) += 1;
        }

        Ok(StoreStats {
            competitors: state.competitors.len(),
            entries_by_mode,
        })
    }

    fn validate_dataset(&self, mut dataset: Dataset) -> Result<Dataset> {
        let mut competitor_ids = HashSet::new();
        for competitor in &dataset.competitors {
            if !competitor_ids.insert(competitor.id) {
                return Err(ScoringError::invalid_input(format!(
                    "duplicate competitor id {}",
                    competitor.id
                )));
            }
        }

        let mut keys = HashSet::new();
        for entry in &mut dataset.entries {
            if entry.mode != dataset.mode {
                return Err(ScoringError::invalid_input(format!(
                    "entry for '{}' belongs to mode {}, dataset is {}",
                    entry.event_id, entry.mode, dataset.mode
                )));
            }

            if !competitor_ids.contains(&entry.competitor_id) {
                return Err(ScoringError::UnknownCompetitor {
                    competitor_id: entry.competitor_id.to_string(),
                });
            }

            let event = self.catalog.lookup(entry.mode, &entry.event_id)?;
            entry.points = self.calculator.points_for(event, entry.raw_value)?;

            if !keys.insert(ScoreKey::from(&*entry)) {
                return Err(ScoringError::invalid_input(format!(
                    "duplicate entry for competitor {} in '{}'",
                    entry.competitor_id, entry.event_id
                )));
            }
        }

        Ok(dataset)
    }

    fn ordered_entries(&self, state: &StoreState, mode: Mode) -> Vec<ScoreEntry> {
        let mut entries: Vec<(usize, usize, ScoreEntry)> = state
            .entries
            .values()
            .filter(|entry| entry.mode == mode)
            .map(|entry| {
                let competitor_position = state
                    .positions
                    .get(&entry.competitor_id)
                    .copied()
                    .unwrap_or(usize::MAX);
                let event_position = self
                    .catalog
                    .position(mode, &entry.event_id)
                    .unwrap_or(usize::MAX);
                (competitor_position, event_position, entry.clone())
            })
            .collect();

        entries.sort_by_key(|(competitor_position, event_position, _)| {
            (*competitor_position, *event_position)
        });

        entries.into_iter().map(|(_, _, entry)| entry).collect()
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| ScoringError::Internal {
            message: "Failed to acquire store read lock".to_string(),
        })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| ScoringError::Internal {
            message: "Failed to acquire store write lock".to_string(),
        })
    }
}

impl Default for CompetitorStore {
    fn default() -> Self {
        Self::new(
            Arc::new(StaticEventCatalog::new()),
            Arc::new(IaafPointsCalculator::new()),
        )
    }
}

impl std::fmt::Debug for CompetitorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompetitorStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
