//! Error types for the scoring engine
//!
//! Every engine operation reports failures through [`ScoringError`]. The
//! variants are recoverable at the call boundary; the HTTP layer maps them to
//! status codes and the metrics layer labels rejections with [`ScoringError::kind`].

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Custom error types for specific scoring scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Unknown mode: {mode}")]
    UnknownMode { mode: String },

    #[error("Competitor not found: {competitor_id}")]
    UnknownCompetitor { competitor_id: String },

    #[error("Unknown event '{event_id}' for mode {mode}")]
    UnknownEvent { mode: String, event_id: String },

    #[error("Invalid input{}: {reason}", describe_location(.line, .column))]
    InvalidInput {
        reason: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("Malformed document at line {line}: {reason}")]
    MalformedDocument { line: usize, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScoringError {
    /// Invalid input that is not tied to a document position
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            reason: reason.into(),
            line: None,
            column: None,
        }
    }

    /// Invalid cell content at a 1-based document line and column
    pub fn invalid_cell(reason: impl Into<String>, line: usize, column: usize) -> Self {
        ScoringError::InvalidInput {
            reason: reason.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Stable machine-readable name of the error
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::UnknownMode { .. } => "UnknownMode",
            ScoringError::UnknownCompetitor { .. } => "UnknownCompetitor",
            ScoringError::UnknownEvent { .. } => "UnknownEvent",
            ScoringError::InvalidInput { .. } => "InvalidInput",
            ScoringError::MalformedDocument { .. } => "MalformedDocument",
            ScoringError::Configuration { .. } => "Configuration",
            ScoringError::Internal { .. } => "Internal",
        }
    }

    /// Attach a document position to an [`ScoringError::InvalidInput`] that lacks one
    pub fn at_cell(self, line: usize, column: usize) -> Self {
        match self {
            ScoringError::InvalidInput {
                reason,
                line: None,
                column: None,
            } => ScoringError::invalid_cell(reason, line, column),
            other => other,
        }
    }
}

fn describe_location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {}, column {}", line, column),
        (Some(line), None) => format!(" at line {}", line),
        _ => String::new(),
    }
}
