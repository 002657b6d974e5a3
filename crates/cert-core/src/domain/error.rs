//! Domain-level error taxonomy for CERT measurements.

/// Errors produced while obtaining or validating embeddings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Transport(String),

    #[error("embedding provider returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),

    #[error("embedding provider returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("embedding {index} is empty")]
    EmptyVector { index: usize },

    #[error("embedding {index} contains a non-finite component")]
    NonFinite { index: usize },

    #[error("embedding {index} has zero norm")]
    ZeroNorm { index: usize },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::Transport(err.to_string())
    }
}

/// CERT measurement errors.
///
/// Every variant is detected locally and surfaces to the caller unchanged;
/// none of them is retried or replaced by a default value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CertError {
    #[error("need at least 2 responses for consistency measurement")]
    InsufficientData { count: usize },

    #[error("cannot calculate coordination effect with zero baseline")]
    ZeroBaseline,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type for CERT measurement operations.
pub type Result<T> = std::result::Result<T, CertError>;
