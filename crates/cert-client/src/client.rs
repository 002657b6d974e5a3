//! HTTP client for a running CERT service.

use std::time::Duration;

use cert_core::{ConsistencyResult, CoordinationInput, CoordinationResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Default service address, matching `certd`'s default bind port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ConsistencyRequest<'a> {
    agent_id: &'a str,
    prompt: &'a str,
    responses: &'a [String],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `GET /health` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Client for the CERT measurement endpoints.
#[derive(Debug, Clone)]
pub struct CertClient {
    base_url: String,
    http: reqwest::Client,
}

impl CertClient {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cert-client/", env!("CARGO_PKG_VERSION")))
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self::with_http_client(base_url, http))
    }

    /// Use a preconfigured reqwest client.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /measure/consistency`
    pub async fn measure_consistency(
        &self,
        agent_id: &str,
        prompt: &str,
        responses: &[String],
    ) -> Result<ConsistencyResult> {
        let body = ConsistencyRequest {
            agent_id,
            prompt,
            responses,
        };
        debug!(agent_id, responses = responses.len(), "requesting consistency measurement");
        let response = self
            .http
            .post(self.url("/measure/consistency"))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// `POST /measure/coordination`
    pub async fn measure_coordination(
        &self,
        input: &CoordinationInput,
    ) -> Result<CoordinationResult> {
        debug!(
            pattern = %input.interaction_pattern,
            "requesting coordination measurement"
        );
        let response = self
            .http
            .post(self.url("/measure/coordination"))
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
