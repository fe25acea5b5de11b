use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::pipeline::enhance::EnhancedUi;
use crate::pipeline::error::AnalysisError;
use crate::ui::element_model::count_nodes;

/// One line of the request trace file.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub route: String,

    pub analyzer: String,
    pub profile: String,

    pub image_sha1: Option<String>,
    pub image_bytes: usize,

    pub outcome: String,
    pub error: Option<String>,

    pub output_nodes: Option<usize>,
    pub duration_ms: Option<u128>,
}

impl TraceEvent {
    pub fn now(route: &str, analyzer: &str, profile: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            route: route.to_string(),
            analyzer: analyzer.to_string(),
            profile: profile.to_string(),
            image_sha1: None,
            image_bytes: 0,
            outcome: "pending".to_string(),
            error: None,
            output_nodes: None,
            duration_ms: None,
        }
    }

    pub fn with_image(mut self, image: &[u8]) -> Self {
        self.image_bytes = image.len();
        if !image.is_empty() {
            self.image_sha1 = Some(fingerprint(image));
        }
        self
    }

    pub fn with_result(mut self, result: &Result<EnhancedUi, AnalysisError>) -> Self {
        match result {
            Ok(enhanced) => {
                self.outcome = "ok".to_string();
                self.output_nodes = Some(count_nodes(&enhanced.enhanced_ui));
            }
            Err(e) => {
                self.outcome = outcome_label(e).to_string();
                self.error = Some(e.to_string());
            }
        }
        self
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

fn outcome_label(e: &AnalysisError) -> &'static str {
    match e {
        AnalysisError::MissingInput(_) => "missing_input",
        AnalysisError::Provider(_) => "provider_error",
        AnalysisError::Parse { .. } => "parse_error",
        AnalysisError::MalformedInput(_) => "malformed_input",
    }
}

pub fn fingerprint(bytes: &[u8]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
