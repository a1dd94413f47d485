//! pitchplot-pv - Pitch Visualizer Service
//!
//! **Module Identity:**
//! - Name: pitchplot-pv (Pitch Visualizer)
//! - Port: 5750 (default)
//!
//! Accepts a pitch-statistics screenshot, extracts the table through a
//! multimodal model, and serves the validated, filtered records plus a
//! rendered movement profile.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use pitchplot_common::config::ServiceConfig;
use pitchplot_pv::vision::AnthropicClient;
use pitchplot_pv::AppState;

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
        "Starting PitchPlot Visualizer (pitchplot-pv) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ServiceConfig::load()?;

    if config.vision.api_key.is_none() {
        warn!("No API key configured; extraction requests will fail until ANTHROPIC_API_KEY is set");
    }

    let extractor = AnthropicClient::new(config.vision.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build extraction client: {}", e))?;

    let port = config.port;
    let state = AppState::new(config, Arc::new(extractor));
    let app = pitchplot_pv::build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
