//! CERT Core Library
//!
//! Two stateless measurements over externally supplied agent data:
//!
//! - **Behavioral consistency**: how semantically similar an agent's repeated
//!   responses to one prompt are ([`ConsistencyEngine`]).
//! - **Coordination effect**: whether two agents together beat the product of
//!   their independent baselines ([`calculate_coordination_effect`]).
//!
//! Neither engine keeps state between calls; both are safe to share across
//! concurrent callers.

pub mod consistency;
pub mod coordination;
pub mod domain;
pub mod embedding;
pub mod metrics;
pub mod obs;
pub mod telemetry;

pub use consistency::{cosine_distance, pairwise_stats, ConsistencyEngine};
pub use coordination::{calculate_coordination_effect, measure_coordination};

pub use domain::{
    patterns, CertError, ConsistencyResult, CoordinationInput, CoordinationResult,
    DistanceAccumulator, DistanceStats, EmbeddingError, ImpactClassification, Result,
    BENEFICIAL_THRESHOLD, DEGRADED_THRESHOLD, HIGHLY_BENEFICIAL_THRESHOLD, MAX_RESPONSES,
    MIN_RESPONSES,
};

pub use embedding::{
    validate_embeddings, EmbeddingBackend, EmbeddingProvider, EmbeddingResult, HashingEmbedder,
    HttpEmbedder, HttpEmbedderConfig, DEFAULT_EMBEDDING_MODEL, DEFAULT_HASH_DIMENSIONS,
};

pub use metrics::{MetricsSnapshot, METRICS};
pub use obs::{
    emit_consistency_measured, emit_coordination_measured, emit_embedding_failed,
    emit_measurement_rejected, measurement_span, MeasurementSpan,
};
pub use telemetry::{init_tracing, parse_log_format};

/// CERT version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
