//! Error types and HTTP error responses for the CERT service.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cert_core::{obs, CertError, METRICS};
use serde::{Deserialize, Serialize};

/// Application-level error: a measurement error on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub CertError);

/// JSON body returned on error.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Convert a body that failed to deserialize into a validation error.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        let err = CertError::Validation(rejection.body_text());
        obs::emit_measurement_rejected("request", &err);
        METRICS.inc_rejected();
        Self(err)
    }

    pub fn status(&self) -> StatusCode {
        status_for_error(&self.0)
    }
}

impl From<CertError> for ApiError {
    fn from(err: CertError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

fn status_for_error(e: &CertError) -> StatusCode {
    match e {
        CertError::InsufficientData { .. } | CertError::ZeroBaseline | CertError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        CertError::Embedding(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cert_core::EmbeddingError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(CertError::InsufficientData { count: 1 }).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(CertError::ZeroBaseline).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(CertError::Validation("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(CertError::Embedding(EmbeddingError::Transport("down".into()))).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
