use std::time::Instant;

use axum::{
    Json,
    extract::{Multipart, Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::pipeline::enhance::{
    EnhancedUi, NO_IMAGE, decode_image_base64, enhance_document, enhance_image,
};
use crate::pipeline::error::AnalysisError;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::server::telemetry::spawn_blocking_with_tracing;
use crate::trace::trace::TraceEvent;
use crate::ui::profile::{NormalizeProfile, UnknownProfile};

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub analyzer: String,
    pub profile: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        analyzer: state.analyzer.name().to_string(),
        profile: state.profile.to_string(),
    })
}

/// `POST /analyze` with `{"image_base64": "..."}`.
pub async fn analyze_base64(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<EnhancedUi>, ApiError> {
    let profile = resolve_profile(&state, &query)?;

    let encoded = match body {
        Ok(Json(AnalyzeRequest {
            image_base64: Some(encoded),
        })) => encoded,
        _ => return Err(AnalysisError::MissingInput(NO_IMAGE.to_string()).into()),
    };

    let image = decode_image_base64(&encoded)?;
    run_analysis(&state, "/analyze", image, profile).await
}

/// `POST /upload` with a multipart field named `image`.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    mut multipart: Multipart,
) -> Result<Json<EnhancedUi>, ApiError> {
    let profile = resolve_profile(&state, &query)?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
            image = Some(bytes.to_vec());
            break;
        }
    }

    let image = image.ok_or_else(|| AnalysisError::MissingInput(NO_IMAGE.to_string()))?;
    run_analysis(&state, "/upload", image, profile).await
}

/// `POST /enhance` with an element tree; no provider call.
pub async fn enhance(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EnhancedUi>, ApiError> {
    let profile = resolve_profile(&state, &query)?;
    let Json(document) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let enhanced_ui = enhance_document(document, &profile.options()).map_err(|e| {
        warn!(error = %e, "rejected ui elements");
        ApiError::from(e)
    })?;

    Ok(Json(EnhancedUi {
        enhanced_ui,
        raw_text: None,
    }))
}

/// `POST /api`: remember the payload and greet.
pub async fn echo(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(data) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    info!(payload = %data, "received");
    state.logs.push(data);

    Ok(Json(json!({ "message": "Hello, World!" })))
}

/// `GET /logs`
pub async fn logs(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "logs": state.logs.snapshot() }))
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_profile(state: &AppState, query: &ProfileQuery) -> Result<NormalizeProfile, ApiError> {
    match query.profile.as_deref() {
        Some(name) => name
            .parse()
            .map_err(|e: UnknownProfile| ApiError::BadRequest(e.to_string())),
        None => Ok(state.profile),
    }
}

async fn run_analysis(
    state: &AppState,
    route: &'static str,
    image: Vec<u8>,
    profile: NormalizeProfile,
) -> Result<Json<EnhancedUi>, ApiError> {
    let analyzer = state.analyzer.clone();
    let tracer = state.tracer.clone();

    let result = spawn_blocking_with_tracing(move || {
        let started = Instant::now();
        let event = TraceEvent::now(route, analyzer.name(), profile.as_str()).with_image(&image);

        let result = enhance_image(analyzer.as_ref(), &image, &profile.options());

        tracer.log(
            &event
                .with_result(&result)
                .with_duration(started.elapsed().as_millis()),
        );
        result
    })
    .await
    .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))?;

    match result {
        Ok(enhanced) => Ok(Json(enhanced)),
        Err(e) => {
            warn!(route, error = %e, "analysis failed");
            Err(e.into())
        }
    }
}
