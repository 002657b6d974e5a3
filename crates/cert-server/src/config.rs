//! Configuration for the CERT measurement service.
//!
//! Loaded from environment variables (a `.env` file is honoured by `certd`):
//! - CERT_HOST: bind address (default `0.0.0.0`)
//! - CERT_PORT: bind port (default `8000`)
//! - CERT_LOG_FORMAT: `text` | `json` (default `text`)
//! - CERT_EMBEDDING_BACKEND: `http` (default) | `hashing`
//! - CERT_EMBEDDING_URL: OpenAI-compatible embeddings endpoint; required for
//!   the `http` backend
//! - CERT_EMBEDDING_MODEL: model requested from the endpoint (default `all-MiniLM-L6-v2`)
//! - CERT_EMBEDDING_API_KEY: bearer token for the endpoint
//! - CERT_EMBEDDING_TIMEOUT_SECS: request timeout (default `30`)
//! - CERT_EMBEDDING_DIMENSIONS: expected vector dimension for the remote endpoint
//! - CERT_HASH_DIMENSIONS: hashing embedder dimension (default `384`)
//!
//! Invalid values fail fast; there is no silent fallback for a malformed setting.
//! The lexical hashing embedder is only used when `CERT_EMBEDDING_BACKEND=hashing`
//! is set explicitly.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cert_core::{
    parse_log_format, EmbeddingBackend, EmbeddingProvider, HashingEmbedder, HttpEmbedder,
    HttpEmbedderConfig, DEFAULT_EMBEDDING_MODEL, DEFAULT_HASH_DIMENSIONS,
};
use tracing::{info, warn};

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub dimensions: Option<usize>,
    pub hash_dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            url: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            dimensions: None,
            hash_dimensions: DEFAULT_HASH_DIMENSIONS,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Emit JSON log lines instead of text.
    pub log_json: bool,
    pub embedding: EmbeddingSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: default_port(),
            log_json: false,
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("CERT_HOST") {
            config.host = host
                .trim()
                .parse()
                .with_context(|| format!("CERT_HOST must be an IP address, got {host:?}"))?;
        }
        if let Some(port) = get("CERT_PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("CERT_PORT must be a port number, got {port:?}"))?;
        }
        if let Some(format) = get("CERT_LOG_FORMAT") {
            config.log_json = parse_log_format(&format).ok_or_else(|| {
                anyhow!("CERT_LOG_FORMAT must be `text` or `json`, got {format:?}")
            })?;
        }

        let embedding = &mut config.embedding;
        if let Some(backend) = get("CERT_EMBEDDING_BACKEND") {
            embedding.backend = backend
                .parse()
                .map_err(|e: String| anyhow!("CERT_EMBEDDING_BACKEND: {e}"))?;
        }
        embedding.url = get("CERT_EMBEDDING_URL");
        embedding.api_key = get("CERT_EMBEDDING_API_KEY");
        if let Some(model) = get("CERT_EMBEDDING_MODEL") {
            embedding.model = model;
        }
        if let Some(secs) = get("CERT_EMBEDDING_TIMEOUT_SECS") {
            embedding.timeout_secs = parse_positive("CERT_EMBEDDING_TIMEOUT_SECS", &secs)?;
        }
        if let Some(dims) = get("CERT_EMBEDDING_DIMENSIONS") {
            embedding.dimensions = Some(parse_positive("CERT_EMBEDDING_DIMENSIONS", &dims)?);
        }
        if let Some(dims) = get("CERT_HASH_DIMENSIONS") {
            embedding.hash_dimensions = parse_positive("CERT_HASH_DIMENSIONS", &dims)?;
        }

        config.embedding.validate()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build the embedding provider described by this configuration.
    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        self.embedding.build_provider()
    }
}

impl EmbeddingSettings {
    /// The `http` backend needs an endpoint; there is no implicit fallback.
    pub fn validate(&self) -> Result<()> {
        if self.backend == EmbeddingBackend::Http && self.url.is_none() {
            return Err(missing_endpoint());
        }
        Ok(())
    }

    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        match self.backend {
            EmbeddingBackend::Http => {
                let url = self.url.as_deref().ok_or_else(missing_endpoint)?;
                let mut http = HttpEmbedderConfig::new(url)
                    .with_model(&self.model)
                    .with_timeout(Duration::from_secs(self.timeout_secs));
                if let Some(key) = &self.api_key {
                    http = http.with_api_key(key);
                }
                if let Some(dims) = self.dimensions {
                    http = http.with_dimension(dims);
                }
                let embedder =
                    HttpEmbedder::new(http).context("Failed to create embedding HTTP client")?;
                info!(url = %url, model = %self.model, "using remote embedding provider");
                Ok(Arc::new(embedder))
            }
            EmbeddingBackend::Hashing => {
                warn!(
                    dimensions = self.hash_dimensions,
                    "using lexical hashing embedder; scores do not reflect semantic similarity"
                );
                Ok(Arc::new(HashingEmbedder::with_dimensions(
                    self.hash_dimensions,
                )))
            }
        }
    }
}

fn missing_endpoint() -> anyhow::Error {
    anyhow!(
        "CERT_EMBEDDING_URL must point at a sentence-embedding endpoint \
         (set CERT_EMBEDDING_BACKEND=hashing for lexical-only scores)"
    )
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|_| anyhow!("{key} must be a positive integer, got {value:?}"))?;
    if parsed <= T::default() {
        return Err(anyhow!("{key} must be greater than zero, got {value:?}"));
    }
    Ok(parsed)
}
