//! Event definitions and the combined-events scoring tables
//!
//! Parameters follow the IAAF combined-events tables. Jumps are measured in
//! centimetres, throws in metres and runs in seconds.

use crate::types::{Direction, EventId, Mode};
use serde::{Deserialize, Serialize};

/// Coefficients of the points formula `A * |raw - B|^C`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Definition of a single event within a mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    /// Identifier, unique within its mode
    pub id: EventId,
    /// Display label
    pub label: String,
    /// Unit of the raw performance (`s`, `m` or `cm`)
    pub unit: String,
    pub direction: Direction,
    pub params: ScoringParams,
}

impl EventDefinition {
    /// Create a track event (lower raw value is better)
    pub fn track(id: &str, label: &str, a: f64, b: f64, c: f64) -> Self {
        Self::new(id, label, "s", Direction::LowerIsBetter, a, b, c)
    }

    /// Create a field event (higher raw value is better)
    pub fn field(id: &str, label: &str, unit: &str, a: f64, b: f64, c: f64) -> Self {
        Self::new(id, label, unit, Direction::HigherIsBetter, a, b, c)
    }

    fn new(
        id: &str,
        label: &str,
        unit: &str,
        direction: Direction,
        a: f64,
        b: f64,
        c: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            unit: unit.to_string(),
            direction,
            params: ScoringParams { a, b, c },
        }
    }
}

/// Men's decathlon, in competition order
pub fn decathlon_events() -> Vec<EventDefinition> {
    vec![
        EventDefinition::track("100m", "100 m", 25.4347, 18.0, 1.81),
        EventDefinition::field("longJump", "Long jump", "cm", 0.14354, 220.0, 1.4),
        EventDefinition::field("shotPut", "Shot put", "m", 51.39, 1.5, 1.05),
        EventDefinition::field("highJump", "High jump", "cm", 0.8465, 75.0, 1.42),
        EventDefinition::track("400m", "400 m", 1.53775, 82.0, 1.81),
        EventDefinition::track("110mHurdles", "110 m hurdles", 5.74352, 28.5, 1.92),
        EventDefinition::field("discusThrow", "Discus throw", "m", 12.91, 4.0, 1.1),
        EventDefinition::field("poleVault", "Pole vault", "cm", 0.2797, 100.0, 1.35),
        EventDefinition::field("javelinThrow", "Javelin throw", "m", 10.14, 7.0, 1.08),
        EventDefinition::track("1500m", "1500 m", 0.03768, 480.0, 1.85),
    ]
}

/// Women's heptathlon, in competition order
pub fn heptathlon_events() -> Vec<EventDefinition> {
    vec![
        EventDefinition::track("100mHurdles", "100 m hurdles", 9.23076, 26.7, 1.835),
        EventDefinition::field("highJump", "High jump", "cm", 1.84523, 75.0, 1.348),
        EventDefinition::field("shotPut", "Shot put", "m", 56.0211, 1.5, 1.05),
        EventDefinition::track("200m", "200 m", 4.99087, 42.5, 1.81),
        EventDefinition::field("longJump", "Long jump", "cm", 0.188807, 210.0, 1.41),
        EventDefinition::field("javelinThrow", "Javelin throw", "m", 15.9803, 3.8, 1.04),
        EventDefinition::track("800m", "800 m", 0.11193, 254.0, 1.88),
    ]
}

/// Default event table for a mode
pub fn default_events(mode: Mode) -> Vec<EventDefinition> {
    match mode {
        Mode::Decathlon => decathlon_events(),
        Mode::Heptathlon => heptathlon_events(),
    }
}
