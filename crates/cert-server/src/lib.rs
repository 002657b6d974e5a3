//! CERT measurement service.
//!
//! A thin HTTP boundary over the stateless engines in `cert-core`. Engine
//! errors become `{ "error": message }` bodies; no state survives a request.

pub mod config;
pub mod error;
pub mod http;

pub use config::{EmbeddingSettings, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use http::{router, AppState, ConsistencyRequest, CoordinationRequest, HealthResponse};
