//! Deterministic feature-hashing embedder.
//!
//! Produces reproducible embeddings without a model: every lowercased
//! alphanumeric token and every adjacent token pair is hashed with SHA-256
//! into a signed bucket, and the result is L2-normalized. Texts that share
//! words land close together.
//!
//! Similarity here is lexical, not semantic. Paraphrases that reorder or swap
//! words ("Paris is the capital of France." / "France's capital city is
//! Paris.") spread out unevenly and can score *less* consistent than
//! unrelated sentences, so scores from this embedder do not carry the
//! meaning a sentence model gives them. It is opt-in for offline runs and
//! tests (`CERT_EMBEDDING_BACKEND=hashing`).

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{EmbeddingProvider, EmbeddingResult};

/// Default output dimension (matches all-MiniLM-L6-v2).
pub const DEFAULT_HASH_DIMENSIONS: usize = 384;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;
const EMPTY_FEATURE: &str = "\u{0}empty";

/// Feature-hashing embedder. Lexical only; see the module docs.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    model_id: String,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashingEmbedder {
    /// Create an embedder with [`DEFAULT_HASH_DIMENSIONS`] buckets.
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_HASH_DIMENSIONS)
    }

    /// Create an embedder with a custom number of buckets (at least 1).
    pub fn with_dimensions(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            model_id: format!("feature-hash-{dimensions}"),
        }
    }

    /// Embed one text synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        for token in &tokens {
            self.add_feature(&mut embedding, token, UNIGRAM_WEIGHT);
        }
        for pair in tokens.windows(2) {
            let feature = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut embedding, &feature, BIGRAM_WEIGHT);
        }

        let mut norm = l2_norm(&embedding);
        if norm == 0.0 {
            // No tokens, or every bucket cancelled out.
            self.add_feature(&mut embedding, EMPTY_FEATURE, UNIGRAM_WEIGHT);
            norm = l2_norm(&embedding);
        }
        for val in &mut embedding {
            *val /= norm;
        }

        embedding
    }

    fn add_feature(&self, embedding: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        embedding[bucket] += sign * weight;
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.embed_text(t)).collect();
        tracing::debug!(
            model = %self.model_id,
            count = texts.len(),
            "hashing embedder batch complete"
        );
        Ok(vectors)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let embedder = HashingEmbedder::new();
        assert_eq!(
            embedder.embed_text("The capital of France is Paris."),
            embedder.embed_text("The capital of France is Paris.")
        );
    }

    #[test]
    fn test_dimensions_and_unit_norm() {
        let embedder = HashingEmbedder::with_dimensions(64);
        let v = embedder.embed_text("agents coordinate on a shared task");
        assert_eq!(v.len(), 64);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::new();
        assert_eq!(
            embedder.embed_text("Hello, World!"),
            embedder.embed_text("hello world")
        );
    }

    #[test]
    fn test_empty_text_has_nonzero_norm() {
        let embedder = HashingEmbedder::new();
        let v = embedder.embed_text("   ");
        assert!(v.iter().any(|x| *x != 0.0));
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let embedder = HashingEmbedder::with_dimensions(0);
        assert_eq!(embedder.dimension(), Some(1));
        assert_eq!(embedder.embed_text("anything").len(), 1);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let embedder = HashingEmbedder::new();
        let texts = vec!["first".to_string(), "second".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(batch[0], embedder.embed_text("first"));
        assert_eq!(batch[1], embedder.embed_text("second"));
    }
}
