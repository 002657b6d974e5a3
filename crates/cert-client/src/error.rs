//! Error types for cert-client

use cert_core::CertError;
use thiserror::Error;

/// Errors returned by the CERT client and observer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server could not be reached or the request did not complete
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status and an `{error}` body
    #[error("CERT server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Measurement failed in-process
    #[error(transparent)]
    Measurement(#[from] CertError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl ClientError {
    /// Whether the server rejected the input (4xx or a local input error).
    pub fn is_rejection(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => (400..500).contains(status),
            ClientError::Measurement(e) => !matches!(e, CertError::Embedding(_)),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
