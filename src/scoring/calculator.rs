//! Points calculator trait and implementations
//!
//! This module defines the interface for converting a raw performance into
//! points and provides the standard combined-events formula.

use crate::catalog::EventDefinition;
use crate::error::{Result, ScoringError};
use crate::types::Direction;

/// Trait for converting raw performances into points
#[cfg_attr(test, mockall::automock)]
pub trait PointsCalculator: Send + Sync {
    /// Calculate the points awarded for a raw performance in an event
    ///
    /// # Arguments
    /// * `event` - Definition carrying direction and scoring parameters
    /// * `raw_value` - Performance in the event's unit
    ///
    /// # Returns
    /// Non-negative points, or `InvalidInput` when the raw value is outside
    /// the event's physical domain
    fn points_for(&self, event: &EventDefinition, raw_value: f64) -> Result<u32>;
}

/// Standard combined-events scoring
///
/// Track: `floor(A * (B - raw)^C)`, field: `floor(A * (raw - B)^C)`; zero when
/// the performance does not beat the baseline `B`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IaafPointsCalculator;

impl IaafPointsCalculator {
    /// Create a new calculator
    pub fn new() -> Self {
        Self
    }

    /// Check that a raw value lies in the domain of times, distances and heights
    pub fn validate_raw_value(event: &EventDefinition, raw_value: f64) -> Result<()> {
        if !raw_value.is_finite() {
            return Err(ScoringError::invalid_input(format!(
                "raw value for '{}' must be a finite number",
                event.id
            )));
        }

        if raw_value <= 0.0 {
            return Err(ScoringError::invalid_input(format!(
                "raw value for '{}' must be greater than zero, got {}",
                event.id, raw_value
            )));
        }

        Ok(())
    }
}

impl PointsCalculator for IaafPointsCalculator {
    fn points_for(&self, event: &EventDefinition, raw_value: f64) -> Result<u32> {
        Self::validate_raw_value(event, raw_value)?;

        let params = &event.params;
        let margin = match event.direction {
            Direction::LowerIsBetter => params.b - raw_value,
            Direction::HigherIsBetter => raw_value - params.b,
        };

        if margin <= 0.0 {
            return Ok(0);
        }

        let points = (params.a * margin.powf(params.c)).floor();

        // `as` saturates, so absurd inputs cap at u32::MAX instead of wrapping
        Ok(points as u32)
    }
}
