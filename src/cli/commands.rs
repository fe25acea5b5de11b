use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::config::{AppConfig, bind_address, resolve_api_key, resolve_profile};
use crate::pipeline::enhance::enhance_document;
use crate::provider::analyzer::{GeminiBackend, ImageAnalyzer, MockImageAnalyzer};
use crate::server::routes::serve;
use crate::server::state::AppState;
use crate::trace::logger::TraceLogger;

// ============================================================================
// serve subcommand
// ============================================================================

pub async fn cmd_serve(
    config: &AppConfig,
    host: Option<&str>,
    port: Option<u16>,
    profile: Option<&str>,
    mock_response: Option<&str>,
    trace_file: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = resolve_profile(profile, config)?;
    let analyzer = build_analyzer(config, mock_response)?;

    let tracer = match trace_file.or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    info!(
        analyzer = analyzer.name(),
        %profile,
        trace = tracer.is_enabled(),
        "starting sketch-enhancer"
    );

    let state = AppState::new(analyzer, profile).with_tracer(tracer);
    let addr = bind_address(host, port, config);
    serve(&addr, state, config.server.max_body_bytes).await?;

    Ok(())
}

// ============================================================================
// normalize subcommand
// ============================================================================

/// Normalize a JSON file and return the serialized result.
pub fn cmd_normalize(
    config: &AppConfig,
    input: &str,
    profile: Option<&str>,
    pretty: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let profile = resolve_profile(profile, config)?;
    let content = std::fs::read_to_string(input)?;
    let document: serde_json::Value = serde_json::from_str(&content)?;

    let enhanced = enhance_document(document, &profile.options())?;

    let output = if pretty {
        serde_json::to_string_pretty(&enhanced)?
    } else {
        serde_json::to_string(&enhanced)?
    };
    Ok(output)
}

// ============================================================================
// Helpers
// ============================================================================

/// Mock analyzer when a canned response file is given, Gemini otherwise.
pub fn build_analyzer(
    config: &AppConfig,
    mock_response: Option<&str>,
) -> Result<Arc<dyn ImageAnalyzer>, Box<dyn std::error::Error>> {
    if let Some(path) = mock_response {
        let response = std::fs::read_to_string(path)?;
        return Ok(Arc::new(MockImageAnalyzer::new(&response)));
    }

    let api_key = resolve_api_key(config);
    if api_key.is_none() {
        warn!("no provider API key configured; image requests will fail");
    }

    Ok(Arc::new(GeminiBackend::new(
        &config.provider.endpoint,
        &config.provider.model,
        api_key,
        Duration::from_secs(config.provider.timeout_secs),
    )))
}

/// Install the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
