//! moodsense - Facial Emotion Analysis Microservice
//!
//! Accepts image uploads on POST /analyze/, preprocesses them, and
//! delegates emotion classification to an external face-analysis sidecar.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use moodsense::classifier::DeepFaceClient;
use moodsense::config::{Args, Config};
use moodsense::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting moodsense v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(&args)?;
    info!("Classifier sidecar: {}", config.classifier_url);

    let classifier = DeepFaceClient::new(
        config.classifier_url.clone(),
        config.classifier_timeout,
    )
    .map_err(|e| anyhow::anyhow!("Failed to construct classifier client: {}", e))?;

    let state = AppState::new(Arc::new(classifier));
    let app = moodsense::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("moodsense listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
