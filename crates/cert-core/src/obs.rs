//! Structured observability hooks for CERT measurements.
//!
//! This module provides:
//! - Request-scoped tracing spans (`measurement_span`, and the `MeasurementSpan` RAII guard for sync code)
//! - Emission functions for measurement outcomes: measured, rejected, embedding failure
//!
//! Events are emitted at `info!` level; rejections and failures at `warn!`.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{ConsistencyResult, CoordinationResult};

/// Build a span tagged with the measurement kind and a request id.
///
/// Use with `tracing::Instrument` around async work; the span is `Send`.
pub fn measurement_span(kind: &str, request_id: &Uuid) -> tracing::Span {
    tracing::info_span!("cert.measure", kind = %kind, request_id = %request_id)
}

/// RAII guard that enters a measurement span for the rest of a sync scope.
///
/// Do not hold it across an `.await`; use [`measurement_span`] there.
pub struct MeasurementSpan {
    request_id: Uuid,
    _span: tracing::span::EnteredSpan,
}

impl MeasurementSpan {
    /// Create and enter a span with a fresh request id.
    pub fn enter(kind: &str) -> Self {
        let request_id = Uuid::new_v4();
        Self {
            request_id,
            _span: measurement_span(kind, &request_id).entered(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

/// Emit event: consistency measured.
pub fn emit_consistency_measured(result: &ConsistencyResult) {
    info!(
        event = "consistency.measured",
        agent_id = %result.agent_id,
        num_responses = result.num_responses,
        consistency_score = result.consistency_score,
        mean_distance = result.mean_semantic_distance,
        std_distance = result.std_semantic_distance,
    );
}

/// Emit event: coordination effect measured.
pub fn emit_coordination_measured(result: &CoordinationResult) {
    info!(
        event = "coordination.measured",
        interaction_pattern = %result.interaction_pattern,
        gamma = result.coordination_effect,
        impact = %result.impact_classification,
        change_percent = result.performance_change_percent,
    );
}

/// Emit event: a measurement was rejected for invalid input (warning level).
pub fn emit_measurement_rejected(kind: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "measurement.rejected", kind = %kind, reason = %reason);
}

/// Emit event: the embedding provider failed (warning level).
pub fn emit_embedding_failed(model: &str, error: &dyn std::fmt::Display) {
    warn!(event = "embedding.failed", model = %model, error = %error);
}
