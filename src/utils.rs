//! Utility functions for the scoring service

use crate::types::CompetitorId;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique competitor ID
pub fn generate_competitor_id() -> CompetitorId {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Render a raw performance for CSV export
///
/// Uses the shortest decimal that parses back to the same `f64`, with `.` as
/// separator and no exponent or digit grouping.
pub fn format_raw_value(value: f64) -> String {
    format!("{}", value)
}

/// Parse a raw performance cell; `None` for blank cells
pub fn parse_raw_value(cell: &str) -> Option<Result<f64, std::num::ParseFloatError>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.parse::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_competitor_id();
        let id2 = generate_competitor_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_format_raw_value() {
        assert_eq!(format_raw_value(11.0), "11");
        assert_eq!(format_raw_value(7.2), "7.2");
        assert_eq!(format_raw_value(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_raw_value(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_format_parse_round_trip() {
        for value in [10.395, 720.0, 254.56, 0.000123, 1234567.891] {
            let text = format_raw_value(value);
            let parsed = parse_raw_value(&text).unwrap().unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_parse_blank_and_garbage() {
        assert!(parse_raw_value("").is_none());
        assert!(parse_raw_value("   ").is_none());
        assert!(parse_raw_value("abc").unwrap().is_err());
        assert_eq!(parse_raw_value(" 11.5 ").unwrap().unwrap(), 11.5);
    }
}
