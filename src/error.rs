//! Error types for moodsense
//!
//! The analyze surface carries a deliberately coarse two-shape contract:
//! the size ceiling is the only failure reported as a client error
//! (`{"detail": ...}`, 400); everything downstream of it flattens into a
//! generic server error (`{"error": ...}`, 500). Callers depend on the
//! `detail` vs `error` key differing by status code, so the flattening is
//! preserved on purpose.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::pipeline::PipelineError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload exceeds the 10 MiB ceiling (400)
    #[error("File size exceeds the 10 MB limit")]
    PayloadTooLarge,

    /// Upload bytes could not be decoded (flattened to 500)
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// External classifier fault (flattened to 500)
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// Anything else (flattened to 500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::PayloadTooLarge => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": self.to_string() })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": other.to_string() })),
            )
                .into_response(),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_too_large_message_is_exact() {
        // Callers match on this message verbatim
        assert_eq!(
            ApiError::PayloadTooLarge.to_string(),
            "File size exceeds the 10 MB limit"
        );
    }
}
