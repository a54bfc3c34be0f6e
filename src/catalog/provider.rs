//! Event catalog trait and implementations
//!
//! This module defines the lookup-by-mode registry of event definitions,
//! along with the static implementation backed by the scoring tables.

use crate::catalog::definitions::{default_events, EventDefinition};
use crate::error::{Result, ScoringError};
use crate::types::Mode;
use std::collections::HashSet;

/// Trait for providing the ordered event set of each mode
pub trait EventProvider: Send + Sync {
    /// Ordered event definitions of a mode (display and CSV column order)
    fn events_for_mode(&self, mode: Mode) -> &[EventDefinition];

    /// Look up one event of a mode
    fn lookup(&self, mode: Mode, event_id: &str) -> Result<&EventDefinition> {
        self.events_for_mode(mode)
            .iter()
            .find(|event| event.id == event_id)
            .ok_or_else(|| ScoringError::UnknownEvent {
                mode: mode.to_string(),
                event_id: event_id.to_string(),
            })
    }

    /// Position of an event in its mode's ordering
    fn position(&self, mode: Mode, event_id: &str) -> Option<usize> {
        self.events_for_mode(mode)
            .iter()
            .position(|event| event.id == event_id)
    }

    /// Get all available modes
    fn available_modes(&self) -> Vec<Mode> {
        Mode::ALL.to_vec()
    }
}

/// Static event catalog
///
/// Holds one immutable, validated event list per mode:
/// - DEC: the ten decathlon events
/// - HEP: the seven heptathlon events
#[derive(Debug, Clone)]
pub struct StaticEventCatalog {
    decathlon: Vec<EventDefinition>,
    heptathlon: Vec<EventDefinition>,
}

impl StaticEventCatalog {
    /// Create a catalog with the standard scoring tables
    pub fn new() -> Self {
        Self {
            decathlon: default_events(Mode::Decathlon),
            heptathlon: default_events(Mode::Heptathlon),
        }
    }

    /// Create with custom event sets
    pub fn with_events(
        decathlon: Vec<EventDefinition>,
        heptathlon: Vec<EventDefinition>,
    ) -> Result<Self> {
        validate_events(Mode::Decathlon, &decathlon)?;
        validate_events(Mode::Heptathlon, &heptathlon)?;

        Ok(Self {
            decathlon,
            heptathlon,
        })
    }
}

impl Default for StaticEventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventProvider for StaticEventCatalog {
    fn events_for_mode(&self, mode: Mode) -> &[EventDefinition] {
        match mode {
            Mode::Decathlon => &self.decathlon,
            Mode::Heptathlon => &self.heptathlon,
        }
    }
}

/// Validate the event list of one mode
pub fn validate_events(mode: Mode, events: &[EventDefinition]) -> Result<()> {
    if events.is_empty() {
        return Err(ScoringError::Configuration {
            message: format!("Mode {} must define at least one event", mode),
        });
    }

    let mut seen = HashSet::new();
    for event in events {
        if event.id.trim().is_empty() {
            return Err(ScoringError::Configuration {
                message: format!("Mode {} has an event with an empty id", mode),
            });
        }

        if event.id.contains(',') || event.id.contains('"') {
            return Err(ScoringError::Configuration {
                message: format!("Event id '{}' cannot contain ',' or '\"'", event.id),
            });
        }

        if !seen.insert(event.id.as_str()) {
            return Err(ScoringError::Configuration {
                message: format!("Duplicate event id '{}' in mode {}", event.id, mode),
            });
        }

        let params = &event.params;
        if !(params.a.is_finite() && params.a > 0.0) {
            return Err(ScoringError::Configuration {
                message: format!("Event '{}' coefficient A must be positive", event.id),
            });
        }
        if !(params.b.is_finite() && params.b >= 0.0) {
            return Err(ScoringError::Configuration {
                message: format!("Event '{}' coefficient B must be non-negative", event.id),
            });
        }
        if !(params.c.is_finite() && params.c > 0.0) {
            return Err(ScoringError::Configuration {
                message: format!("Event '{}' coefficient C must be positive", event.id),
            });
        }
    }

    Ok(())
}
