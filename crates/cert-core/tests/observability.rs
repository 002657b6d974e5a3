//! Observability tests for CERT measurement tracing.
//!
//! These tests verify that the structured emission functions and spans run
//! under a capturing subscriber without panicking.

use cert_core::{
    calculate_coordination_effect, emit_consistency_measured, emit_coordination_measured,
    emit_embedding_failed, emit_measurement_rejected, measurement_span, ConsistencyResult,
    MeasurementSpan,
};
use tracing::Instrument;
use tracing_test::traced_test;

fn sample_consistency() -> ConsistencyResult {
    ConsistencyResult {
        agent_id: "agent-1".to_string(),
        prompt: "What is the capital of France?".to_string(),
        consistency_score: 0.92,
        mean_semantic_distance: 0.12,
        std_semantic_distance: 0.0096,
        num_responses: 3,
        timestamp: chrono::Utc::now(),
    }
}

/// Test: emit_consistency_measured creates an info-level event
#[traced_test]
#[test]
fn test_emit_consistency_measured() {
    emit_consistency_measured(&sample_consistency());
}

/// Test: emit_coordination_measured creates an info-level event
#[traced_test]
#[test]
fn test_emit_coordination_measured() {
    let result = calculate_coordination_effect(0.85, 0.8, 0.88, "sequential").unwrap();
    emit_coordination_measured(&result);
}

/// Test: rejection and failure events are warn-level
#[traced_test]
#[test]
fn test_emit_warnings() {
    emit_measurement_rejected("consistency", &"need at least 2 responses");
    emit_embedding_failed("all-MiniLM-L6-v2", &"connection refused");
}

/// Test: MeasurementSpan::enter creates an entered span without panicking
#[traced_test]
#[test]
fn test_measurement_span_enter() {
    let span = MeasurementSpan::enter("coordination");
    drop(span);
}

/// Test: measurement_span instruments async work
#[traced_test]
#[tokio::test]
async fn test_measurement_span_instruments_future() {
    let request_id = uuid::Uuid::new_v4();
    async {
        emit_consistency_measured(&sample_consistency());
    }
    .instrument(measurement_span("consistency", &request_id))
    .await;
}
