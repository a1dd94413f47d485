//! Image extraction pipeline endpoint
//!
//! POST /api/parse-image runs the full pipeline: intake validation, one
//! provider call, JSON recovery, record validation, usage filtering.
//! Per-record rejections are silent; an empty surviving list is a valid
//! result, not an error.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pitchplot_common::extract::extract_json_array;
use pitchplot_common::filter::{filter_by_usage, DEFAULT_USAGE_THRESHOLD};
use pitchplot_common::record::validate_records;
use pitchplot_common::PitchRecord;

use crate::error::{ApiError, ApiResult};
use crate::intake;
use crate::AppState;

/// POST /api/parse-image request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseImageRequest {
    /// Base64 image payload, data-URI prefix already stripped by the caller
    #[serde(default)]
    pub image_base64: String,

    /// Usage threshold in [0, 1]
    #[serde(default = "default_threshold")]
    pub usage_threshold: f64,

    /// Session identity for last-request-wins cancellation. Requests
    /// without one never supersede each other.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

fn default_threshold() -> f64 {
    DEFAULT_USAGE_THRESHOLD
}

/// POST /api/parse-image response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseImageResponse {
    pub pitch_data: Vec<PitchRecord>,
}

/// POST /api/parse-image
pub async fn parse_image(
    State(state): State<AppState>,
    Json(request): Json<ParseImageRequest>,
) -> ApiResult<Json<ParseImageResponse>> {
    let result = run_pipeline(&state, &request).await;

    if let Err(ref err) = result {
        // Losing to a newer request is not a service fault
        if !matches!(err, ApiError::Superseded) {
            state.record_error(&err.to_string()).await;
        }
        tracing::warn!(status = %err.status_code(), error = %err, "Extraction request failed");
    }

    result.map(|pitch_data| Json(ParseImageResponse { pitch_data }))
}

async fn run_pipeline(
    state: &AppState,
    request: &ParseImageRequest,
) -> Result<Vec<PitchRecord>, ApiError> {
    if request.image_base64.trim().is_empty() {
        return Err(ApiError::no_image());
    }

    if !(0.0..=1.0).contains(&request.usage_threshold) {
        return Err(ApiError::BadRequest(format!(
            "usageThreshold must lie in [0, 1], got {}",
            request.usage_threshold
        )));
    }

    let info = intake::inspect_image(&request.image_base64, state.config.max_image_bytes)?;

    tracing::info!(
        media_type = %info.media_type,
        size_bytes = info.size_bytes,
        threshold = request.usage_threshold,
        "Submitting image for extraction"
    );

    let raw = match request.session_id {
        Some(session_id) => {
            extract_with_cancellation(state, &request.image_base64, info.media_type, session_id)
                .await?
        }
        None => {
            state
                .extractor
                .extract_table(&request.image_base64, info.media_type)
                .await?
        }
    };

    let values = extract_json_array(&raw)?;
    let records = validate_records(&values);
    let kept = filter_by_usage(records, request.usage_threshold);

    tracing::info!(
        decoded = values.len(),
        kept = kept.len(),
        "Extraction pipeline finished"
    );

    Ok(kept)
}

/// Run the provider call under the session's cancellation token. When a
/// newer request arrives for the same session, the in-flight one is
/// cancelled and reports itself superseded; its result is discarded
/// rather than merged.
async fn extract_with_cancellation(
    state: &AppState,
    image_base64: &str,
    media_type: &str,
    session_id: Uuid,
) -> Result<String, ApiError> {
    let token = state.begin_session(session_id).await;

    let outcome = tokio::select! {
        _ = token.cancelled() => {
            tracing::info!(session_id = %session_id, "Extraction superseded by a newer request");
            Err(ApiError::Superseded)
        }
        reply = state.extractor.extract_table(image_base64, media_type) => {
            reply.map_err(ApiError::from)
        }
    };

    state.finish_session(session_id, &token).await;

    outcome
}

/// Build parse routes
pub fn parse_routes() -> Router<AppState> {
    Router::new().route("/api/parse-image", post(parse_image))
}
