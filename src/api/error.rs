//! Mapping of scoring errors onto HTTP responses

use crate::error::ScoringError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    /// A rejected scoring operation
    Scoring(ScoringError),
    /// A request body over the configured size limit
    PayloadTooLarge { message: String },
}

impl ApiError {
    /// HTTP status of the error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Scoring(error) => status_for(error),
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Error kind reported in the response body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Scoring(error) => error.kind(),
            ApiError::PayloadTooLarge { .. } => "PayloadTooLarge",
        }
    }
}

/// HTTP status for each error kind
pub fn status_for(error: &ScoringError) -> StatusCode {
    match error {
        ScoringError::UnknownMode { .. } | ScoringError::MalformedDocument { .. } => {
            StatusCode::BAD_REQUEST
        }
        ScoringError::UnknownCompetitor { .. } | ScoringError::UnknownEvent { .. } => {
            StatusCode::NOT_FOUND
        }
        ScoringError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringError::Configuration { .. } | ScoringError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<ScoringError> for ApiError {
    fn from(error: ScoringError) -> Self {
        ApiError::Scoring(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge {
                message: rejection.body_text(),
            }
        } else {
            ApiError::Scoring(ScoringError::invalid_input(rejection.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Scoring(error) => error.to_string(),
            ApiError::PayloadTooLarge { message } => message.clone(),
        };
        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ScoringError::UnknownMode {
                mode: "X".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ScoringError::MalformedDocument {
                line: 1,
                reason: "empty".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ScoringError::UnknownCompetitor {
                competitor_id: "x".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ScoringError::invalid_input("negative")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&ScoringError::Internal {
                message: "poisoned".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
