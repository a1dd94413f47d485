//! Integration tests for pitchplot-pv API endpoints
//!
//! The extraction provider is replaced with a scripted fake so the full
//! HTTP pipeline runs without network access.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use serde_json::json;
use tokio::sync::Notify;
use tower::util::ServiceExt;

use pitchplot_common::config::ServiceConfig;
use pitchplot_pv::vision::{TableExtractor, VisionError};
use pitchplot_pv::AppState;

/// Scripted provider behavior for one test app
#[derive(Clone)]
enum FakeReply {
    /// Return this reply text
    Text(&'static str),
    /// Fail with this provider error
    Fail(VisionError),
    /// Never resolve; the request parks until cancelled or aborted
    Hang,
}

struct FakeExtractor {
    reply: FakeReply,
    started: Option<Arc<Notify>>,
}

#[async_trait]
impl TableExtractor for FakeExtractor {
    async fn extract_table(
        &self,
        _image_base64: &str,
        _media_type: &str,
    ) -> Result<String, VisionError> {
        if let Some(started) = &self.started {
            started.notify_one();
        }
        match &self.reply {
            FakeReply::Text(text) => Ok((*text).to_string()),
            FakeReply::Fail(err) => Err(err.clone()),
            FakeReply::Hang => std::future::pending().await,
        }
    }
}

/// Test helper: build an app whose provider always behaves as scripted
fn test_app(reply: FakeReply) -> axum::Router {
    test_app_with_notify(reply, None)
}

fn test_app_with_notify(reply: FakeReply, started: Option<Arc<Notify>>) -> axum::Router {
    let state = AppState::new(
        ServiceConfig::default(),
        Arc::new(FakeExtractor { reply, started }),
    );
    pitchplot_pv::build_router(state)
}

/// Minimal valid PNG payload for intake
fn png_base64() -> String {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R']);
    STANDARD.encode(bytes)
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "pitchplot-pv");
    assert!(json["version"].is_string());
    assert!(json["git_hash"].is_string());
    assert!(json["uptime_seconds"].is_u64());
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_parse_image_recovers_fenced_reply() {
    let app = test_app(FakeReply::Text(
        "Here is the data:\n```json\n[{\"pitchType\":\"Slider\",\"usage\":0.31,\"iVB\":2.1,\"horzBrk\":-5.4}]\n```",
    ));

    let body = json!({ "imageBase64": png_base64(), "usageThreshold": 0.05 });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let pitch_data = json["pitchData"].as_array().unwrap();
    assert_eq!(pitch_data.len(), 1);
    assert_eq!(pitch_data[0]["pitchType"], "Slider");
    assert_eq!(pitch_data[0]["usage"], 0.31);
    assert_eq!(pitch_data[0]["iVB"], 2.1);
    assert_eq!(pitch_data[0]["horzBrk"], -5.4);
    // Fields the model never mentioned come back as explicit nulls
    assert!(pitch_data[0]["velocity"].is_null());
    assert!(pitch_data[0]["spin"].is_null());
}

#[tokio::test]
async fn test_string_usage_record_is_dropped() {
    let app = test_app(FakeReply::Text(
        r#"[{"pitchType":"Fastball","usage":0.6,"iVB":16.0,"horzBrk":8.0},
            {"pitchType":"Sinker","usage":"52%","iVB":10.0,"horzBrk":15.0}]"#,
    ));

    let body = json!({ "imageBase64": png_base64(), "usageThreshold": 0.02 });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let pitch_data = json["pitchData"].as_array().unwrap();
    assert_eq!(pitch_data.len(), 1);
    assert_eq!(pitch_data[0]["pitchType"], "Fastball");
}

#[tokio::test]
async fn test_placeholder_break_is_dropped() {
    let app = test_app(FakeReply::Text(
        r#"[{"pitchType":"Curveball","usage":0.2,"iVB":"-","horzBrk":7.7}]"#,
    ));

    let body = json!({ "imageBase64": png_base64(), "usageThreshold": 0.0 });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["pitchData"], json!([]));
}

#[tokio::test]
async fn test_threshold_filters_and_preserves_order() {
    let reply = r#"[{"pitchType":"Changeup","usage":0.03,"iVB":5.0,"horzBrk":12.0},
                    {"pitchType":"Fastball","usage":0.08,"iVB":16.0,"horzBrk":8.0}]"#;

    // Strict threshold keeps only the second record
    let app = test_app(FakeReply::Text(reply));
    let body = json!({ "imageBase64": png_base64(), "usageThreshold": 0.05 });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();
    let json = body_json(response).await;
    let pitch_data = json["pitchData"].as_array().unwrap();
    assert_eq!(pitch_data.len(), 1);
    assert_eq!(pitch_data[0]["pitchType"], "Fastball");

    // Default threshold keeps both, in reply order
    let app = test_app(FakeReply::Text(reply));
    let body = json!({ "imageBase64": png_base64() });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();
    let json = body_json(response).await;
    let pitch_data = json["pitchData"].as_array().unwrap();
    assert_eq!(pitch_data.len(), 2);
    assert_eq!(pitch_data[0]["pitchType"], "Changeup");
    assert_eq!(pitch_data[1]["pitchType"], "Fastball");
}

#[tokio::test]
async fn test_empty_surviving_list_is_ok() {
    let app = test_app(FakeReply::Text("```json\n[]\n```"));

    let body = json!({ "imageBase64": png_base64() });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pitchData"], json!([]));
}

#[tokio::test]
async fn test_missing_image_is_bad_request() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .oneshot(post_json("/api/parse-image", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No image provided");
}

#[tokio::test]
async fn test_invalid_threshold_is_bad_request() {
    let app = test_app(FakeReply::Text("[]"));

    let body = json!({ "imageBase64": png_base64(), "usageThreshold": 1.5 });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("usageThreshold must lie in [0, 1]"));
}

#[tokio::test]
async fn test_non_image_payload_is_bad_request() {
    let app = test_app(FakeReply::Text("[]"));

    let body = json!({ "imageBase64": STANDARD.encode(b"definitely not an image payload") });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unrecognized image format");
}

#[tokio::test]
async fn test_no_json_found_is_unprocessable() {
    let app = test_app(FakeReply::Text("I cannot read this image."));

    let body = json!({ "imageBase64": png_base64() });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "No JSON array found in model reply: I cannot read this image."
    );
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let app = test_app(FakeReply::Text(r#"[{"pitchType": }]"#));

    let body = json!({ "imageBase64": png_base64() });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed JSON in model reply:"));
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let app = test_app(FakeReply::Fail(VisionError::Api(
        529,
        "Overloaded".to_string(),
    )));

    let body = json!({ "imageBase64": png_base64() });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Overloaded");
}

#[tokio::test]
async fn test_missing_api_key_is_bad_gateway() {
    let app = test_app(FakeReply::Fail(VisionError::MissingApiKey));

    let body = json!({ "imageBase64": png_base64() });
    let response = app
        .oneshot(post_json("/api/parse-image", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "API key not configured");
}

#[tokio::test]
async fn test_failures_surface_in_health() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .clone()
        .oneshot(post_json("/api/parse-image", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["last_error"], "No image provided");
}

#[tokio::test]
async fn test_parse_image_rejects_get() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/parse-image")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_plot_returns_svg() {
    let app = test_app(FakeReply::Text("[]"));

    let body = json!({
        "pitchData": [
            { "pitchType": "Slider", "usage": 0.31, "iVB": 2.1, "horzBrk": -5.4 }
        ]
    });
    let response = app.oneshot(post_json("/api/plot", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/svg+xml"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let svg = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("pitch-circle"));
    assert!(svg.contains("#22C55E"));
    assert!(svg.contains(r#"data-pitch="Slider""#));
}

#[tokio::test]
async fn test_plot_with_no_records_draws_empty_frame() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .oneshot(post_json("/api/plot", &json!({ "pitchData": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let svg = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(svg.contains("Horizontal Break (in)"));
    assert!(!svg.contains("pitch-circle"));
}

#[tokio::test]
async fn test_visualizer_page_injects_thresholds() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Pitch Movement Visualizer"));
    assert!(page.contains("const DEFAULT_THRESHOLD = 0.02;"));
    assert!(page.contains("const STRICT_THRESHOLD = 0.05;"));
    assert!(!page.contains("{{DEFAULT_THRESHOLD}}"));
}

#[tokio::test]
async fn test_cors_preflight_is_permissive() {
    let app = test_app(FakeReply::Text("[]"));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/parse-image")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_newer_request_supersedes_older() {
    let started = Arc::new(Notify::new());
    let app = test_app_with_notify(FakeReply::Hang, Some(started.clone()));

    let session_id = uuid::Uuid::new_v4();
    let body = json!({
        "imageBase64": png_base64(),
        "usageThreshold": 0.02,
        "sessionId": session_id,
    });

    // First request parks inside the provider call
    let first_app = app.clone();
    let first_body = body.clone();
    let first = tokio::spawn(async move {
        first_app
            .oneshot(post_json("/api/parse-image", &first_body))
            .await
            .unwrap()
    });

    // Do not race the second request past the first one's registration
    started.notified().await;

    let second_app = app.clone();
    let second_body = body.clone();
    let second = tokio::spawn(async move {
        second_app
            .oneshot(post_json("/api/parse-image", &second_body))
            .await
            .unwrap()
    });

    let first_response = first.await.unwrap();
    assert_eq!(first_response.status(), StatusCode::CONFLICT);
    let first_json = body_json(first_response).await;
    assert_eq!(first_json["error"], "Superseded by a newer request");

    // The second request is still parked upstream; it only loses to an
    // even newer request, so end it here
    second.abort();
}

#[tokio::test]
async fn test_requests_without_session_do_not_supersede() {
    let app = test_app(FakeReply::Text(
        r#"[{"pitchType":"Slider","usage":0.31,"iVB":2.1,"horzBrk":-5.4}]"#,
    ));

    // Two session-less requests in sequence both succeed
    for _ in 0..2 {
        let body = json!({ "imageBase64": png_base64() });
        let response = app
            .clone()
            .oneshot(post_json("/api/parse-image", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
