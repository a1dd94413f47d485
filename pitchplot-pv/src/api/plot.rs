//! Movement profile rendering endpoint
//!
//! POST /api/plot accepts a pitchData list (normally the output of
//! /api/parse-image) and returns a standalone SVG document. Values run
//! through the record validator again, so hand-built payloads degrade the
//! same way model output does instead of failing the request.

use axum::{
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use pitchplot_common::record::validate_records;

use crate::render;
use crate::AppState;

/// POST /api/plot request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRequest {
    #[serde(default)]
    pub pitch_data: Vec<Value>,
}

/// POST /api/plot
pub async fn plot(Json(request): Json<PlotRequest>) -> impl IntoResponse {
    let records = validate_records(&request.pitch_data);
    let svg = render::movement_profile(&records);

    tracing::debug!(records = records.len(), svg_bytes = svg.len(), "Rendered movement profile");

    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

/// Build plot routes
pub fn plot_routes() -> Router<AppState> {
    Router::new().route("/api/plot", post(plot))
}
