//! Embedding provider abstraction.
//!
//! The consistency engine only needs a `text -> vector` capability. This
//! module defines that capability as a trait and ships two implementations:
//!
//! ```text
//! EmbeddingProvider (trait)
//! ├── embed_batch(&[String]) -> Vec<Vec<f32>>   // one vector per text, same order
//! ├── embed(&str) -> Vec<f32>                   // default: batch of one
//! ├── dimension() -> Option<usize>              // known output dimension, if any
//! └── model_name() -> &str
//!
//! HashingEmbedder   deterministic feature hashing, no model files
//! HttpEmbedder      OpenAI-compatible embeddings endpoint over HTTP
//! ```
//!
//! In-memory fakes for tests live in [`fakes`].

pub mod fakes;
mod hashing;
mod http;

use async_trait::async_trait;

use crate::domain::EmbeddingError;

pub use hashing::{HashingEmbedder, DEFAULT_HASH_DIMENSIONS};
pub use http::{HttpEmbedder, HttpEmbedderConfig, DEFAULT_EMBEDDING_MODEL};

/// Result type for embedding operations.
pub type EmbeddingResult<T> = std::result::Result<T, EmbeddingError>;

/// A capability that maps text to fixed-length numeric vectors.
///
/// Implementations must be deterministic enough that the same text embeds to
/// the same vector within one measurement call, and must return vectors of a
/// single dimension per call.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed every text, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        let actual = vectors.len();
        match vectors.pop() {
            Some(v) if actual == 1 => Ok(v),
            _ => Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual,
            }),
        }
    }

    /// Output dimension, when known ahead of a call.
    fn dimension(&self) -> Option<usize>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}

/// Provider selection for the binaries.
///
/// `Http` (a sentence-model endpoint) is the default; `Hashing` is the
/// lexical [`HashingEmbedder`] and must be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    #[default]
    Http,
    Hashing,
}

impl EmbeddingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Hashing => "hashing",
        }
    }
}

impl std::fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "hashing" => Ok(Self::Hashing),
            other => Err(format!(
                "unknown embedding backend {other:?} (expected `http` or `hashing`)"
            )),
        }
    }
}

/// Check a provider's batch output before any distance is computed.
///
/// Rejects count mismatches, empty vectors, mixed dimensions, non-finite
/// components and zero-norm vectors (cosine distance is undefined for them).
pub fn validate_embeddings(
    vectors: &[Vec<f32>],
    expected_count: usize,
    expected_dimension: Option<usize>,
) -> EmbeddingResult<()> {
    if vectors.len() != expected_count {
        return Err(EmbeddingError::CountMismatch {
            expected: expected_count,
            actual: vectors.len(),
        });
    }

    let dimension = match expected_dimension {
        Some(d) => d,
        None => match vectors.first() {
            Some(v) => v.len(),
            None => return Ok(()),
        },
    };

    for (index, v) in vectors.iter().enumerate() {
        if v.is_empty() {
            return Err(EmbeddingError::EmptyVector { index });
        }
        if v.len() != dimension {
            return Err(EmbeddingError::DimensionMismatch {
                index,
                expected: dimension,
                actual: v.len(),
            });
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::NonFinite { index });
        }
        if v.iter().all(|x| *x == 0.0) {
            return Err(EmbeddingError::ZeroNorm { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed number of copies of one vector, whatever the input.
    struct FixedCountEmbedder(usize);

    #[async_trait]
    impl EmbeddingProvider for FixedCountEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]; self.0])
        }

        fn dimension(&self) -> Option<usize> {
            None
        }

        fn model_name(&self) -> &str {
            "fixed-count"
        }
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("http".parse(), Ok(EmbeddingBackend::Http));
        assert_eq!(" Hashing ".parse(), Ok(EmbeddingBackend::Hashing));
        assert!("onnx".parse::<EmbeddingBackend>().is_err());
        assert_eq!(EmbeddingBackend::default(), EmbeddingBackend::Http);
    }

    #[tokio::test]
    async fn test_embed_reports_actual_count() {
        assert_eq!(
            FixedCountEmbedder(0).embed("a").await,
            Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            FixedCountEmbedder(2).embed("a").await,
            Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(FixedCountEmbedder(1).embed("a").await, Ok(vec![1.0, 0.0]));
    }

    #[test]
    fn test_validate_accepts_uniform_batch() {
        let vectors = vec![vec![1.0, 0.0], vec![0.5, 0.5]];
        assert!(validate_embeddings(&vectors, 2, None).is_ok());
        assert!(validate_embeddings(&vectors, 2, Some(2)).is_ok());
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let vectors = vec![vec![1.0, 0.0]];
        assert_eq!(
            validate_embeddings(&vectors, 3, None),
            Err(EmbeddingError::CountMismatch {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn test_validate_rejects_mixed_dimensions() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        assert_eq!(
            validate_embeddings(&vectors, 2, None),
            Err(EmbeddingError::DimensionMismatch {
                index: 1,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_validate_rejects_declared_dimension_mismatch() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(matches!(
            validate_embeddings(&vectors, 2, Some(384)),
            Err(EmbeddingError::DimensionMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_degenerate_vectors() {
        assert_eq!(
            validate_embeddings(&[vec![1.0], vec![]], 2, Some(1)),
            Err(EmbeddingError::EmptyVector { index: 1 })
        );
        assert_eq!(
            validate_embeddings(&[vec![1.0, f32::NAN], vec![1.0, 0.0]], 2, None),
            Err(EmbeddingError::NonFinite { index: 0 })
        );
        assert_eq!(
            validate_embeddings(&[vec![1.0, 0.0], vec![0.0, 0.0]], 2, None),
            Err(EmbeddingError::ZeroNorm { index: 1 })
        );
    }
}
