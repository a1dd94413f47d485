//! UI routes - visualizer page (vanilla ES6+, no frameworks)

use axum::{response::Html, routing::get, Router};

use pitchplot_common::filter::{DEFAULT_USAGE_THRESHOLD, STRICT_USAGE_THRESHOLD};

use crate::AppState;

/// GET /
///
/// Single-page visualizer. The filter thresholds are injected at render
/// time so the page and the filter stage cannot drift apart.
async fn visualizer_page() -> Html<String> {
    let html = include_str!("visualizer.html")
        .replace("{{DEFAULT_THRESHOLD}}", &DEFAULT_USAGE_THRESHOLD.to_string())
        .replace("{{STRICT_THRESHOLD}}", &STRICT_USAGE_THRESHOLD.to_string());
    Html(html)
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(visualizer_page))
}
