//! pitchplot-pv library interface
//!
//! Exposes the router, state, and pipeline pieces for integration testing.

pub mod api;
pub mod error;
pub mod intake;
pub mod render;
pub mod vision;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use pitchplot_common::config::ServiceConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::vision::TableExtractor;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: ServiceConfig,
    /// Extraction provider client
    pub extractor: Arc<dyn TableExtractor>,
    /// Cancellation tokens for in-flight extraction sessions
    pub cancellation_tokens: Arc<RwLock<HashMap<Uuid, CancellationToken>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, extractor: Arc<dyn TableExtractor>) -> Self {
        Self {
            config,
            extractor,
            cancellation_tokens: Arc::new(RwLock::new(HashMap::new())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Register an in-flight extraction for a session, superseding any
    /// request already running for it. Last request wins.
    pub async fn begin_session(&self, session_id: Uuid) -> CancellationToken {
        let mut tokens = self.cancellation_tokens.write().await;
        if let Some(previous) = tokens.remove(&session_id) {
            previous.cancel();
        }
        let token = CancellationToken::new();
        tokens.insert(session_id, token.clone());
        token
    }

    /// Drop the session entry unless a newer request has taken the slot.
    /// Superseding happens under the same write lock, so an uncancelled
    /// token here still owns the entry.
    pub async fn finish_session(&self, session_id: Uuid, token: &CancellationToken) {
        let mut tokens = self.cancellation_tokens.write().await;
        if !token.is_cancelled() {
            tokens.remove(&session_id);
        }
    }

    /// Record an error message for the health endpoint.
    pub async fn record_error(&self, message: &str) {
        let mut last_error = self.last_error.write().await;
        *last_error = Some(message.to_string());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::parse_routes())
        .merge(api::plot_routes())
        .merge(api::health_routes())
        .with_state(state)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}
