use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::pipeline::error::AnalysisError;
use crate::provider::analyzer::ImageAnalyzer;
use crate::provider::response::strip_code_fence;
use crate::ui::element_model::{UiElement, count_nodes, decode_elements, element_sequence};
use crate::ui::normalizer::normalize;
use crate::ui::profile::NormalizeOptions;

pub const NO_IMAGE: &str = "No image provided";

/// Response body for a successful enhancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedUi {
    pub enhanced_ui: Vec<UiElement>,

    /// Provider text as received; absent when no provider was involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

/// Decode the `image_base64` request field. A `data:<mime>;base64,` prefix
/// is accepted and dropped.
pub fn decode_image_base64(encoded: &str) -> Result<Vec<u8>, AnalysisError> {
    let trimmed = encoded.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => trimmed,
    };

    if payload.is_empty() {
        return Err(AnalysisError::MissingInput(NO_IMAGE.to_string()));
    }

    Base64
        .decode(payload)
        .map_err(|e| AnalysisError::MissingInput(format!("Invalid image_base64: {}", e)))
}

/// Strip the code fence from provider text and parse what remains.
pub fn parse_provider_text(raw_text: &str) -> Result<Value, AnalysisError> {
    serde_json::from_str(strip_code_fence(raw_text)).map_err(|source| AnalysisError::Parse {
        context: "provider text".to_string(),
        source,
    })
}

/// Normalize an already-parsed document (`ui_elements` object, array, or
/// single node).
pub fn enhance_document(
    document: Value,
    options: &NormalizeOptions,
) -> Result<Vec<UiElement>, AnalysisError> {
    let nodes = decode_elements(element_sequence(document))?;
    let enhanced = normalize(&nodes, true, options);

    debug!(
        input_nodes = count_nodes(&nodes),
        output_nodes = count_nodes(&enhanced),
        "normalized ui elements"
    );

    Ok(enhanced)
}

/// Full path from image bytes to the enhanced tree.
pub fn enhance_image(
    analyzer: &dyn ImageAnalyzer,
    image: &[u8],
    options: &NormalizeOptions,
) -> Result<EnhancedUi, AnalysisError> {
    if image.is_empty() {
        return Err(AnalysisError::MissingInput(NO_IMAGE.to_string()));
    }

    let raw_text = analyzer.analyze(image)?;
    info!(
        analyzer = analyzer.name(),
        chars = raw_text.len(),
        "provider answered"
    );

    let document = parse_provider_text(&raw_text)?;
    let enhanced_ui = enhance_document(document, options)?;

    Ok(EnhancedUi {
        enhanced_ui,
        raw_text: Some(raw_text),
    })
}
