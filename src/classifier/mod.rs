//! Emotion classifier seam
//!
//! The actual face analysis (detection, feature extraction, emotion
//! scoring) happens inside an external pretrained engine consumed as an
//! opaque collaborator. This module defines the trait boundary and the
//! result types; `deepface` holds the production client.

pub mod deepface;

pub use deepface::DeepFaceClient;

use crate::pipeline::PreparedFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Emotion categories the external model scores, in its native order.
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "sad", "surprise", "neutral",
];

/// Classifier errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Could not reach the analysis engine
    #[error("Classifier network error: {0}")]
    Network(String),

    /// Engine responded with a non-success status
    #[error("Classifier error {0}: {1}")]
    Api(u16, String),

    /// Engine response could not be parsed
    #[error("Failed to parse classifier response: {0}")]
    Parse(String),

    /// Engine returned no subject results at all
    #[error("Classifier returned no subjects")]
    NoSubjects,
}

/// Per-subject analysis result from the external engine.
///
/// Scores are native `f64` so they serialize directly; by the engine's
/// convention they are relative magnitudes summing to roughly 100.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectReading {
    /// Highest-confidence emotion label
    pub dominant_emotion: String,
    /// Per-label confidence scores
    pub emotion: HashMap<String, f64>,
}

/// Opaque emotion classification backend.
///
/// Implementations request only the emotion capability with detection
/// enforcement disabled: the engine scores the full frame (or its
/// best-effort face region) even when no face is confidently detected,
/// so a best-effort answer always comes back for borderline images.
#[async_trait::async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Analyze one preprocessed frame, returning one reading per subject.
    async fn analyze(&self, frame: &PreparedFrame) -> Result<Vec<SubjectReading>, ClassifierError>;
}
