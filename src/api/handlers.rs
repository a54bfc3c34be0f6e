//! Request handlers for the scoring API, health and metrics routes

use crate::api::error::ApiError;
use crate::catalog::EventDefinition;
use crate::error::ScoringError;
use crate::service::{AppState, HealthCheck, HealthStatus, ImportSummary};
use crate::types::{Competitor, CompetitorId, Mode, StandingsRow};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Optional `?mode=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

/// Body of `POST /api/competitors`
#[derive(Debug, Deserialize)]
pub struct NewCompetitor {
    pub name: String,
}

/// Body of `POST /api/score`
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub mode: String,
    pub competitor_id: String,
    pub event_id: String,
    pub raw: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub points: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub mode: Mode,
    pub events: Vec<EventDefinition>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub mode: Mode,
    pub rows: Vec<StandingsRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModeSummary {
    pub code: Mode,
    pub name: String,
    pub events: usize,
}

/// Root endpoint handler - shows service information
pub async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": state.config().service.name,
        "version": crate::VERSION,
        "endpoints": [
            "/api/modes",
            "/api/events",
            "/api/competitors",
            "/api/competitors/{id}",
            "/api/score",
            "/api/standings",
            "/api/export.csv",
            "/api/import",
            "/health",
            "/ready",
            "/alive",
            "/metrics"
        ]
    }))
}

/// Health check endpoint handler
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Health check requested");

    match HealthCheck::check(state).await {
        Ok(health) => {
            let status = match health.status {
                HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, Json(health)).into_response()
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Readiness check endpoint handler
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Ready"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "Degraded but ready"),
        Ok(HealthStatus::Unhealthy) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

/// Liveness check endpoint handler
pub async fn alive_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Liveness check requested");

    match HealthCheck::liveness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Metrics endpoint requested");

    match state.metrics().encode_text() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}

/// `GET /api/modes`
pub async fn list_modes(State(state): State<Arc<AppState>>) -> Json<Vec<ModeSummary>> {
    let catalog = state.catalog();
    let modes = catalog
        .available_modes()
        .into_iter()
        .map(|mode| ModeSummary {
            code: mode,
            name: format!("{:?}", mode),
            events: catalog.events_for_mode(mode).len(),
        })
        .collect();

    Json(modes)
}

/// `GET /api/events?mode=`
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> ApiResult<Json<EventsResponse>> {
    let (mode, events) = state.list_events(query.mode.as_deref())?;
    Ok(Json(EventsResponse { mode, events }))
}

/// `GET /api/competitors`
pub async fn list_competitors(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Competitor>>> {
    Ok(Json(state.competitors()?))
}

/// `GET /api/competitors/{id}`
pub async fn get_competitor(
    State(state): State<Arc<AppState>>,
    Path(competitor_id): Path<String>,
) -> ApiResult<Json<Competitor>> {
    let competitor_id = parse_competitor_id(&state, &competitor_id)?;
    Ok(Json(state.competitor(competitor_id)?))
}

/// `POST /api/competitors`
pub async fn add_competitor(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewCompetitor>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Competitor>)> {
    let Json(request) = payload?;
    let competitor = state.add_competitor(&request.name)?;
    Ok((StatusCode::CREATED, Json(competitor)))
}

/// `POST /api/score`
pub async fn record_score(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ScoreRequest>, JsonRejection>,
) -> ApiResult<Json<ScoreResponse>> {
    let Json(request) = payload?;
    let competitor_id = parse_competitor_id(&state, &request.competitor_id)?;

    let points = state.record_score(
        &request.mode,
        competitor_id,
        &request.event_id,
        request.raw,
    )?;
    Ok(Json(ScoreResponse { points }))
}

/// `GET /api/standings?mode=`
pub async fn standings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> ApiResult<Json<StandingsResponse>> {
    let (mode, rows) = state.standings(query.mode.as_deref())?;
    Ok(Json(StandingsResponse { mode, rows }))
}

/// `GET /api/export.csv?mode=`
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> ApiResult<Response> {
    let (mode, document) = state.export_csv(query.mode.as_deref())?;
    let disposition = format!(
        "attachment; filename=\"results-{}.csv\"",
        mode.code().to_lowercase()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response())
}

/// `POST /api/import` with the CSV document as body
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<ImportSummary>> {
    debug!("Import requested ({} bytes)", body.len());

    let summary = tokio::task::spawn_blocking(move || state.import_csv(&body))
        .await
        .map_err(|e| ScoringError::Internal {
            message: format!("Import task failed: {}", e),
        })??;

    Ok(Json(summary))
}

/// A malformed id cannot name a registered competitor
fn parse_competitor_id(
    state: &AppState,
    raw: &str,
) -> std::result::Result<CompetitorId, ScoringError> {
    CompetitorId::parse_str(raw.trim()).map_err(|_| {
        let error = ScoringError::UnknownCompetitor {
            competitor_id: raw.to_string(),
        };
        state.metrics().record_rejection(error.kind());
        error
    })
}
