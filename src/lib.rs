//! moodsense library interface
//!
//! Facial emotion analysis microservice: accepts an uploaded image,
//! preprocesses it to the fixed frame shape the external classifier
//! expects, and returns the classifier's emotion scores as JSON.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::classifier::EmotionClassifier;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Emotion classification backend
    pub classifier: Arc<dyn EmotionClassifier>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self {
            classifier,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
