//! In-memory embedding fakes (testing only)
//!
//! Provides `StaticEmbedder`, `FailingEmbedder` and `CountingEmbedder` that
//! satisfy the [`EmbeddingProvider`] contract without any model or network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{EmbeddingProvider, EmbeddingResult};
use crate::domain::EmbeddingError;

// ---------------------------------------------------------------------------
// StaticEmbedder
// ---------------------------------------------------------------------------

/// Embedder backed by a fixed `text -> vector` table.
///
/// Unknown texts are reported as malformed provider output.
#[derive(Debug, Default, Clone)]
pub struct StaticEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl StaticEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the vector returned for `text`.
    pub fn with(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.table.insert(text.into(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|t| {
                self.table.get(t).cloned().ok_or_else(|| {
                    EmbeddingError::Malformed(format!("no embedding registered for {t:?}"))
                })
            })
            .collect()
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

// ---------------------------------------------------------------------------
// FailingEmbedder
// ---------------------------------------------------------------------------

/// Embedder that fails every call with the configured error.
#[derive(Debug, Clone)]
pub struct FailingEmbedder {
    error: EmbeddingError,
}

impl FailingEmbedder {
    pub fn new(error: EmbeddingError) -> Self {
        Self { error }
    }

    /// Fails like an unreachable provider.
    pub fn unavailable() -> Self {
        Self::new(EmbeddingError::Transport("connection refused".to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        Err(self.error.clone())
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

// ---------------------------------------------------------------------------
// CountingEmbedder
// ---------------------------------------------------------------------------

/// Wraps another provider and counts calls and embedded texts.
#[derive(Debug, Default)]
pub struct CountingEmbedder<P> {
    inner: P,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl<P> CountingEmbedder<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_batch` invocations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total number of texts passed to the inner provider.
    pub fn texts_embedded(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CountingEmbedder<P> {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts).await
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
