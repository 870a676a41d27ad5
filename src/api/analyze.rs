//! Emotion analysis API handler
//!
//! POST /analyze/ — multipart upload in, emotion scores out.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::{
    error::{ApiError, ApiResult},
    pipeline, AppState,
};

/// Upload size ceiling: 10 MiB. Part of the service contract, not a setting.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Successful analysis response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Highest-confidence emotion label for the first subject
    pub dominant_emotion: String,
    /// Per-label confidence scores as native floats
    pub emotion_scores: HashMap<String, f64>,
}

/// POST /analyze/
///
/// Reads the `file` field of a multipart upload, enforces the size
/// ceiling, preprocesses the image, and delegates to the classifier.
/// The size ceiling is the only client-error outcome; every later
/// failure flattens into the generic 500 shape (see [`ApiError`]).
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    match run_analysis(&state, multipart).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            tracing::warn!(error = %err, "Analysis request failed");
            *state.last_error.write().await = Some(err.to_string());
            Err(err)
        }
    }
}

async fn run_analysis(
    state: &AppState,
    mut multipart: Multipart,
) -> ApiResult<AnalyzeResponse> {
    let contents = read_file_field(&mut multipart).await?;

    // Size check happens before any decode or classification attempt
    if contents.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge);
    }

    tracing::debug!(upload_bytes = contents.len(), "Preprocessing upload");

    // Decode and resize are CPU-bound; keep them off the async runtime
    let frame = tokio::task::spawn_blocking(move || pipeline::prepare(&contents))
        .await
        .map_err(|e| ApiError::Other(anyhow::anyhow!("Preprocessing task failed: {}", e)))??;

    let readings = state.classifier.analyze(&frame).await?;

    // Only the first subject is reported; multi-subject frames are not
    // specially handled.
    let first = readings
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Other(anyhow::anyhow!("Classifier returned no subjects")))?;

    tracing::info!(dominant_emotion = %first.dominant_emotion, "Analysis complete");

    Ok(AnalyzeResponse {
        dominant_emotion: first.dominant_emotion,
        emotion_scores: first.emotion,
    })
}

/// Pull the bytes of the multipart field named `file`.
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Other(anyhow::anyhow!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Other(anyhow::anyhow!("Failed to read upload: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::Other(anyhow::anyhow!(
        "Request contained no 'file' field"
    )))
}

/// Build analysis routes.
///
/// The framework body limit is disabled here: the handler enforces the
/// 10 MiB ceiling itself so oversized uploads get the contractual 400
/// rather than a framework-level 413.
pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze/", post(analyze_image))
        .route("/analyze", post(analyze_image))
        .layer(DefaultBodyLimit::disable())
}
