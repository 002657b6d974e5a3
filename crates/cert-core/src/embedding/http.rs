//! Remote embedding provider speaking the OpenAI-compatible embeddings API.
//!
//! Request: `POST {url}` with `{"model": .., "input": [..]}`.
//! Response: `{"data": [{"index": 0, "embedding": [..]}, ..]}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingProvider, EmbeddingResult};
use crate::domain::EmbeddingError;

/// Model requested when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Remote embedder configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpEmbedderConfig {
    /// Full URL of the embeddings endpoint.
    pub url: String,
    pub model: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Expected output dimension; checked on every response when set.
    pub dimension: Option<usize>,
}

impl HttpEmbedderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            dimension: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// HTTP embedding client.
pub struct HttpEmbedder {
    config: HttpEmbedderConfig,
    http_client: reqwest::Client,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> EmbeddingResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("cert-core/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.http_client.post(&self.config.url).json(&EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %self.config.url, "embedding provider error");
            return Err(EmbeddingError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        let vectors = order_by_index(payload.data, texts.len())?;
        debug!(
            model = %self.config.model,
            count = vectors.len(),
            "remote embedding batch complete"
        );
        Ok(vectors)
    }

    fn dimension(&self) -> Option<usize> {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Restore input order from the `index` field; every index must appear once.
fn order_by_index(data: Vec<EmbeddingDatum>, expected: usize) -> EmbeddingResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for datum in data {
        let slot = slots.get_mut(datum.index).ok_or_else(|| {
            EmbeddingError::Malformed(format!(
                "embedding index {} out of range for {} inputs",
                datum.index, expected
            ))
        })?;
        if slot.is_some() {
            return Err(EmbeddingError::Malformed(format!(
                "duplicate embedding index {}",
                datum.index
            )));
        }
        *slot = Some(datum.embedding);
    }

    // Every slot is filled: `expected` unique in-range indices were seen.
    Ok(slots.into_iter().flatten().collect())
}
