//! DeepFace sidecar client
//!
//! Production [`EmotionClassifier`] backend. Talks JSON over HTTP to a
//! DeepFace-compatible analysis sidecar: the preprocessed BGR frame is
//! shipped base64-encoded together with the requested action list and
//! `enforce_detection: false`.

use crate::classifier::{ClassifierError, EmotionClassifier, SubjectReading};
use crate::pipeline::PreparedFrame;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("moodsense/", env!("CARGO_PKG_VERSION"));

/// Analysis request sent to the sidecar
#[derive(Debug, Serialize)]
struct AnalyzeRequest {
    image: FramePayload,
    actions: Vec<&'static str>,
    enforce_detection: bool,
}

/// Raw frame payload: dimensions plus base64-encoded interleaved pixels
#[derive(Debug, Serialize)]
struct FramePayload {
    width: u32,
    height: u32,
    channels: u8,
    color_order: &'static str,
    data: String,
}

/// Analysis response from the sidecar
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    results: Vec<SubjectReading>,
}

/// HTTP client for the DeepFace analysis sidecar
pub struct DeepFaceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DeepFaceClient {
    /// Create a new client for the sidecar at `base_url`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ClassifierError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl EmotionClassifier for DeepFaceClient {
    async fn analyze(&self, frame: &PreparedFrame) -> Result<Vec<SubjectReading>, ClassifierError> {
        let request = AnalyzeRequest {
            image: FramePayload {
                width: frame.width,
                height: frame.height,
                channels: 3,
                color_order: "BGR",
                data: BASE64.encode(&frame.bgr),
            },
            actions: vec!["emotion"],
            enforce_detection: false,
        };

        tracing::debug!(
            width = frame.width,
            height = frame.height,
            payload_bytes = frame.bgr.len(),
            "Submitting frame to analysis sidecar"
        );

        let response = self
            .http_client
            .post(format!("{}/analyze", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api(status.as_u16(), body));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        if parsed.results.is_empty() {
            return Err(ClassifierError::NoSubjects);
        }

        tracing::info!(
            subjects = parsed.results.len(),
            dominant = %parsed.results[0].dominant_emotion,
            "Analysis sidecar returned readings"
        );

        Ok(parsed.results)
    }
}
