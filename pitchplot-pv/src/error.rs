//! Error types for pitchplot-pv
//!
//! Every failure class maps to a distinct, stable status/message pair so
//! callers can discriminate without parsing prose. The response body is
//! always `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pitchplot_common::extract::ExtractError;
use serde_json::json;
use thiserror::Error;

use crate::vision::VisionError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Extraction provider transport or authentication failure (502)
    #[error("{0}")]
    Upstream(#[from] VisionError),

    /// Reply text yielded no decodable JSON array (422)
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// Request was superseded by a newer one for the same session (409)
    #[error("Superseded by a newer request")]
    Superseded,

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Missing image payload, the most common caller error
    pub fn no_image() -> Self {
        ApiError::BadRequest("No image provided".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Extract(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Superseded => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(ApiError::no_image().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Upstream(VisionError::MissingApiKey).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Extract(ExtractError::NoJsonFound {
                snippet: "nope".to_string()
            })
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::Superseded.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_pass_through_unwrapped() {
        assert_eq!(ApiError::no_image().to_string(), "No image provided");
        assert_eq!(
            ApiError::Upstream(VisionError::MissingApiKey).to_string(),
            "API key not configured"
        );
        assert_eq!(
            ApiError::Superseded.to_string(),
            "Superseded by a newer request"
        );
    }

    #[test]
    fn response_body_is_flat_error_object() {
        let response = ApiError::no_image().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
