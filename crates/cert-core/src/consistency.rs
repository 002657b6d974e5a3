//! Behavioral consistency engine.
//!
//! `C(agent, prompt) = max(0, 1 - σ(d) / μ(d))` where `d` ranges over the
//! cosine distances between every unordered pair of response embeddings.
//! A zero mean distance (every response embeds identically) scores `1.0`.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    CertError, ConsistencyResult, DistanceAccumulator, DistanceStats, Result, MAX_RESPONSES,
    MIN_RESPONSES,
};
use crate::embedding::{validate_embeddings, EmbeddingProvider};
use crate::metrics::METRICS;
use crate::obs;

/// Stateless consistency engine over a shared embedding provider.
#[derive(Clone)]
pub struct ConsistencyEngine {
    provider: Arc<dyn EmbeddingProvider>,
}

impl ConsistencyEngine {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Measure how consistently `agent_id` answered `prompt`.
    ///
    /// Embeds each response exactly once, in order. Fails without calling the
    /// provider when fewer than [`MIN_RESPONSES`] or more than
    /// [`MAX_RESPONSES`] responses are given; any provider failure aborts the
    /// whole call.
    pub async fn measure_consistency(
        &self,
        agent_id: &str,
        prompt: &str,
        responses: &[String],
    ) -> Result<ConsistencyResult> {
        if responses.len() < MIN_RESPONSES {
            let err = CertError::InsufficientData {
                count: responses.len(),
            };
            obs::emit_measurement_rejected("consistency", &err);
            METRICS.inc_rejected();
            return Err(err);
        }
        if responses.len() > MAX_RESPONSES {
            let err = CertError::Validation(format!(
                "at most {MAX_RESPONSES} responses per measurement, got {}",
                responses.len()
            ));
            obs::emit_measurement_rejected("consistency", &err);
            METRICS.inc_rejected();
            return Err(err);
        }

        let embeddings = match self.embed_all(responses).await {
            Ok(v) => v,
            Err(e) => {
                obs::emit_embedding_failed(self.provider.model_name(), &e);
                METRICS.inc_embedding_failures();
                return Err(e);
            }
        };

        let stats = pairwise_stats(&embeddings).ok_or_else(|| {
            CertError::InsufficientData {
                count: responses.len(),
            }
        })?;

        let result = ConsistencyResult {
            agent_id: agent_id.to_string(),
            prompt: prompt.to_string(),
            consistency_score: stats.consistency_score(),
            mean_semantic_distance: stats.mean,
            std_semantic_distance: stats.std,
            num_responses: responses.len(),
            timestamp: Utc::now(),
        };

        obs::emit_consistency_measured(&result);
        METRICS.inc_consistency(responses.len() as u64);
        Ok(result)
    }

    async fn embed_all(&self, responses: &[String]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.provider.embed_batch(responses).await?;
        validate_embeddings(&embeddings, responses.len(), self.provider.dimension())?;
        Ok(embeddings)
    }
}

/// Cosine distance `1 - u·v / sqrt(|u|²|v|²)`, computed in `f64`.
///
/// Identical vectors yield exactly `0.0`. The result is clamped to `[0, 2]`
/// to absorb rounding. Callers must pass equal-length, non-zero vectors.
pub fn cosine_distance(u: &[f32], v: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut uu = 0.0f64;
    let mut vv = 0.0f64;
    for (a, b) in u.iter().zip(v) {
        let (a, b) = (f64::from(*a), f64::from(*b));
        dot += a * b;
        uu += a * a;
        vv += b * b;
    }
    let similarity = dot / (uu * vv).sqrt();
    (1.0 - similarity).clamp(0.0, 2.0)
}

/// Mean and population std of the distances over every unordered pair
/// `{i, j}`, `i < j`, accumulated without storing them.
///
/// `None` for fewer than two embeddings.
pub fn pairwise_stats(embeddings: &[Vec<f32>]) -> Option<DistanceStats> {
    let mut acc = DistanceAccumulator::new();
    for (i, u) in embeddings.iter().enumerate() {
        for v in &embeddings[i + 1..] {
            acc.push(cosine_distance(u, v));
        }
    }
    acc.finish()
}
