//! Domain models for CERT.
//!
//! - `ConsistencyResult`: behavioral consistency of one agent on one prompt
//! - `CoordinationInput` / `CoordinationResult`: coordination effect γ between two agents
//! - `CertError`: error taxonomy shared by both engines

pub mod consistency;
pub mod coordination;
pub mod error;

pub use consistency::{
    ConsistencyResult, DistanceAccumulator, DistanceStats, MAX_RESPONSES, MIN_RESPONSES,
};
pub use coordination::{
    patterns, CoordinationInput, CoordinationResult, ImpactClassification, BENEFICIAL_THRESHOLD,
    DEGRADED_THRESHOLD, HIGHLY_BENEFICIAL_THRESHOLD,
};
pub use error::{CertError, EmbeddingError, Result};
