//! HTTP API handlers

pub mod analyze;
pub mod health;

pub use analyze::{analyze_routes, AnalyzeResponse, MAX_UPLOAD_BYTES};
pub use health::health_routes;
