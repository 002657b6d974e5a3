//! CertClient against a live `cert-server` router on an ephemeral port.

use std::sync::Arc;

use cert_client::{AgentObserver, CertClient, ClientError};
use cert_core::{ConsistencyEngine, CoordinationInput, HashingEmbedder, ImpactClassification};
use cert_server::{router, AppState};

async fn spawn_server() -> String {
    let engine = ConsistencyEngine::new(Arc::new(HashingEmbedder::new()));
    let app = router(AppState::new(engine));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_health() {
    let client = CertClient::new(&spawn_server().await).unwrap();
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, cert_core::VERSION);
}

#[tokio::test]
async fn test_measure_consistency_roundtrip() {
    let client = CertClient::new(&spawn_server().await).unwrap();
    let responses = vec![
        "The answer is 42.".to_string(),
        "The answer is 42.".to_string(),
    ];

    let result = client
        .measure_consistency("agent-1", "What is the answer?", &responses)
        .await
        .unwrap();

    assert_eq!(result.agent_id, "agent-1");
    assert_eq!(result.num_responses, 2);
    assert_eq!(result.consistency_score, 1.0);
}

#[tokio::test]
async fn test_insufficient_data_is_api_error() {
    let client = CertClient::new(&spawn_server().await).unwrap();
    let err = client
        .measure_consistency("agent-1", "p", &["only".to_string()])
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(
                message,
                "need at least 2 responses for consistency measurement"
            );
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_measure_coordination_roundtrip() {
    let client = CertClient::new(&spawn_server().await).unwrap();
    let input = CoordinationInput::new(0.87, 0.89, 0.61, "sequential");

    let result = client.measure_coordination(&input).await.unwrap();

    assert_eq!(
        result.impact_classification,
        ImpactClassification::SeverelyDegraded
    );
    assert!((result.coordination_effect - 0.61 / (0.87 * 0.89)).abs() < 1e-12);
}

#[tokio::test]
async fn test_zero_baseline_is_api_error() {
    let client = CertClient::new(&spawn_server().await).unwrap();
    let input = CoordinationInput::new(0.9, 0.0, 0.5, "parallel");

    let err = client.measure_coordination(&input).await.unwrap_err();
    assert!(err.is_rejection());
    assert!(err.to_string().contains("zero baseline"), "{err}");
}

#[tokio::test]
async fn test_observer_over_remote_client() {
    let client = CertClient::new(&spawn_server().await).unwrap();
    let mut observer = AgentObserver::new(client);

    for _ in 0..2 {
        let r = observer.record_response("remote", "p", "same text").await.unwrap();
        assert!(r.is_none());
    }
    let result = observer
        .record_response("remote", "p", "same text")
        .await
        .unwrap()
        .expect("window full");
    assert_eq!(result.consistency_score, 1.0);

    let handoff = observer.record_handoff("remote", "reviewer", 0.64).await.unwrap();
    assert_eq!(handoff.interaction_pattern, "remote_to_reviewer_handoff");
    assert!((handoff.coordination_effect - 1.0).abs() < 1e-9);
}
