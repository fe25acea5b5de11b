use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sketch_enhancer::provider::analyzer::MockImageAnalyzer;
use sketch_enhancer::server::routes::{DEFAULT_MAX_BODY_BYTES, router};
use sketch_enhancer::server::state::AppState;
use sketch_enhancer::ui::profile::NormalizeProfile;
use tower::ServiceExt;

use crate::common::fixtures::FENCED_PROVIDER_TEXT;

mod common;

// ============================================================================
// Helpers
// ============================================================================

fn state_with(response: &str) -> AppState {
    AppState::new(
        Arc::new(MockImageAnalyzer::new(response)),
        NormalizeProfile::Full,
    )
}

fn app(state: AppState) -> Router {
    router(state, DEFAULT_MAX_BODY_BYTES)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_request(field: &str, data: &[u8]) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"sketch.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_reports_analyzer_and_profile() {
    let (status, body) = send(app(state_with("{}")), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["analyzer"], "mock");
    assert_eq!(body["profile"], "full");
}

// ============================================================================
// /analyze (base64 JSON)
// ============================================================================

#[tokio::test]
async fn analyze_returns_enhanced_ui_and_raw_text() {
    let (status, body) = send(
        app(state_with(FENCED_PROVIDER_TEXT)),
        post_json("/analyze", json!({ "image_base64": "aGVsbG8=" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["raw_text"], FENCED_PROVIDER_TEXT);

    let screen = &body["enhanced_ui"][0];
    assert!(screen.get("type").is_none());
    assert_eq!(
        screen["context"],
        "Type: Screen/main, Label: Welcome, Status: visible"
    );
    assert_eq!(screen["elements"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn analyze_honours_profile_query() {
    let (status, body) = send(
        app(state_with(FENCED_PROVIDER_TEXT)),
        post_json(
            "/analyze?profile=standard",
            json!({ "image_base64": "aGVsbG8=" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let screen = &body["enhanced_ui"][0];
    assert_eq!(screen["type"], "Screen/main");
    assert_eq!(screen["elements"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_profile_is_bad_request() {
    let (status, body) = send(
        app(state_with(FENCED_PROVIDER_TEXT)),
        post_json("/analyze?profile=fancy", json!({ "image_base64": "aGVsbG8=" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("fancy"));
}

#[tokio::test]
async fn analyze_without_image_is_400() {
    for request in [
        post_json("/analyze", json!({})),
        post_json("/analyze", json!({ "image_base64": "" })),
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .body(Body::from("not json"))
            .unwrap(),
    ] {
        let (status, body) = send(app(state_with("{}")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No image provided" }));
    }
}

#[tokio::test]
async fn provider_text_that_is_not_json_is_reported() {
    let (status, body) = send(
        app(state_with("no json here")),
        post_json("/analyze", json!({ "image_base64": "aGVsbG8=" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("JSON parse error"));
}

#[tokio::test]
async fn malformed_provider_tree_is_422() {
    let (status, body) = send(
        app(state_with("{\"ui_elements\": [\"Button\"]}")),
        post_json("/analyze", json!({ "image_base64": "aGVsbG8=" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("ui_elements[0]"));
}

// ============================================================================
// /upload (multipart)
// ============================================================================

#[tokio::test]
async fn upload_accepts_image_field() {
    let (status, body) = send(
        app(state_with(FENCED_PROVIDER_TEXT)),
        multipart_request("image", b"\x89PNG fake"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["enhanced_ui"].is_array());
}

#[tokio::test]
async fn upload_without_image_field_is_400() {
    let (status, body) = send(
        app(state_with(FENCED_PROVIDER_TEXT)),
        multipart_request("file", b"\x89PNG fake"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No image provided" }));
}

// ============================================================================
// /enhance (tree in, tree out)
// ============================================================================

#[tokio::test]
async fn enhance_normalizes_posted_tree() {
    let (status, body) = send(
        app(state_with("unused")),
        post_json(
            "/enhance?profile=label-merge",
            json!({ "ui_elements": [
                { "type": "Text", "value": "Name" },
                { "type": "Input/text", "value": "", "status": "editable" }
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "enhanced_ui": [{
            "type": "Input/text",
            "label": "Name",
            "value": "",
            "status": "editable",
            "context": "Label and input combined"
        }]})
    );
}

#[tokio::test]
async fn enhance_rejects_non_record_nodes() {
    let (status, _) = send(
        app(state_with("unused")),
        post_json("/enhance", json!([{ "type": "Text" }, 3])),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// /api + /logs (echo)
// ============================================================================

#[tokio::test]
async fn echo_records_payloads_in_order() {
    let state = state_with("unused");

    let (status, body) = send(app(state.clone()), post_json("/api", json!({ "n": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Hello, World!" }));

    send(app(state.clone()), post_json("/api", json!(["two"]))).await;

    let (status, body) = send(app(state.clone()), get("/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "logs": [{ "n": 1 }, ["two"]] }));
    assert_eq!(state.logs.len(), 2);
}

#[tokio::test]
async fn echo_rejects_invalid_json() {
    let state = state_with("unused");
    let request = Request::builder()
        .method("POST")
        .uri("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))
        .unwrap();

    let (status, body) = send(app(state.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(state.logs.is_empty());
}
