//! Common types used throughout the scoring service

use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for competitors
pub type CompetitorId = Uuid;

/// Identifier of an event within a mode (e.g. `100m`, `longJump`)
pub type EventId = String;

/// Competition mode selecting the active event set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    /// Decathlon, ten events
    #[serde(rename = "DEC")]
    Decathlon,
    /// Heptathlon, seven events
    #[serde(rename = "HEP")]
    Heptathlon,
}

impl Mode {
    /// All supported modes in display order
    pub const ALL: [Mode; 2] = [Mode::Decathlon, Mode::Heptathlon];

    /// Short code used on the wire and in CSV documents
    pub fn code(&self) -> &'static str {
        match self {
            Mode::Decathlon => "DEC",
            Mode::Heptathlon => "HEP",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Mode {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEC" => Ok(Mode::Decathlon),
            "HEP" => Ok(Mode::Heptathlon),
            _ => Err(ScoringError::UnknownMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Whether a smaller or a larger raw value is the better performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Track events measured in time
    LowerIsBetter,
    /// Field events measured in distance or height
    HigherIsBetter,
}

/// A registered competitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    /// Stored exactly as given; never trimmed or case-folded
    pub name: String,
}

/// One recorded performance for a (competitor, mode, event) key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub competitor_id: CompetitorId,
    pub mode: Mode,
    pub event_id: EventId,
    pub raw_value: f64,
    pub points: u32,
}

/// Key under which score entries are upserted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub competitor_id: CompetitorId,
    pub mode: Mode,
    pub event_id: EventId,
}

impl From<&ScoreEntry> for ScoreKey {
    fn from(entry: &ScoreEntry) -> Self {
        Self {
            competitor_id: entry.competitor_id,
            mode: entry.mode,
            event_id: entry.event_id.clone(),
        }
    }
}

/// Points earned in one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPoints {
    pub event_id: EventId,
    pub points: u32,
}

/// A derived standings line for one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub competitor: Competitor,
    /// Points per recorded event in catalog order; events without an entry are absent
    pub per_event_points: Vec<EventPoints>,
    pub total: u32,
    pub rank: u32,
}

impl StandingsRow {
    /// Points earned in an event, if one was recorded
    pub fn points_for(&self, event_id: &str) -> Option<u32> {
        self.per_event_points
            .iter()
            .find(|event| event.event_id == event_id)
            .map(|event| event.points)
    }
}

/// Competitors and entries of one mode, in registration order
///
/// This is the unit produced by CSV decoding and installed by
/// [`crate::competition::CompetitorStore::replace_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub mode: Mode,
    pub competitors: Vec<Competitor>,
    pub entries: Vec<ScoreEntry>,
}

impl Dataset {
    /// Create an empty dataset for a mode
    pub fn empty(mode: Mode) -> Self {
        Self {
            mode,
            competitors: Vec::new(),
            entries: Vec::new(),
        }
    }
}
