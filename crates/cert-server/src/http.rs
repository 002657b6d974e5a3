//! HTTP endpoints for the CERT service using axum.
//!
//! Endpoints:
//! - POST /measure/consistency  - behavioral consistency of one agent
//! - POST /measure/coordination - coordination effect γ between two agents
//! - GET  /health               - liveness and version
//! - GET  /metrics              - measurement counters

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use cert_core::{
    measure_coordination, measurement_span, ConsistencyEngine, ConsistencyResult,
    CoordinationInput, CoordinationResult, MeasurementSpan, MetricsSnapshot, METRICS,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    pub consistency: ConsistencyEngine,
    pub version: &'static str,
}

impl AppState {
    pub fn new(consistency: ConsistencyEngine) -> Self {
        Self {
            consistency,
            version: cert_core::VERSION,
        }
    }
}

/// Build the axum router with all endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/measure/consistency", post(measure_consistency))
        .route("/measure/coordination", post(measure_coordination_effect))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Request / Response types ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyRequest {
    pub agent_id: String,
    pub prompt: String,
    pub responses: Vec<String>,
}

/// Coordination requests share the engine's input shape.
pub type CoordinationRequest = CoordinationInput;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ── Handlers ────────────────────────────────────────────────────────

async fn measure_consistency(
    State(state): State<AppState>,
    payload: Result<Json<ConsistencyRequest>, JsonRejection>,
) -> Result<Json<ConsistencyResult>, ApiError> {
    let Json(request) = payload.map_err(ApiError::from_rejection)?;
    let request_id = Uuid::new_v4();

    let result = state
        .consistency
        .measure_consistency(&request.agent_id, &request.prompt, &request.responses)
        .instrument(measurement_span("consistency", &request_id))
        .await?;

    Ok(Json(result))
}

async fn measure_coordination_effect(
    payload: Result<Json<CoordinationRequest>, JsonRejection>,
) -> Result<Json<CoordinationResult>, ApiError> {
    let Json(request) = payload.map_err(ApiError::from_rejection)?;

    let _span = MeasurementSpan::enter("coordination");
    let result = measure_coordination(&request)?;

    Ok(Json(result))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.to_string(),
    })
}

async fn metrics() -> Json<MetricsSnapshot> {
    Json(METRICS.snapshot())
}
