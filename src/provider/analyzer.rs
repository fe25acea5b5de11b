use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64;
use tracing::debug;

use crate::provider::error::ProviderError;
use crate::provider::response::{Content, GenerateRequest, GenerateResponse, InlineData, Part};

// ============================================================================
// ImageAnalyzer trait — the opaque image-to-text capability
// ============================================================================

/// Turns sketch image bytes into the provider's free-text answer.
///
/// Implementations block; the server calls them from a blocking task.
pub trait ImageAnalyzer: Send + Sync {
    fn analyze(&self, image: &[u8]) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const SKETCH_PROMPT: &str = r#"You are given a hand-drawn sketch of a mobile or web interface.
Identify every UI element and return ONLY valid JSON with this shape:
{
  "ui_elements": [
    {
      "type": "Screen/main|Popup/modal|Popup/bottom|Text|Input/text|Button/primary|Button/close",
      "label": "visible label or title",
      "value": "text content, if any",
      "status": "visible|enabled|editable",
      "context": "short description of the element's role",
      "elements": [ ...children, for screens and popups only... ]
    }
  ]
}
Respond with ONLY valid JSON, no explanation."#;

// ============================================================================
// Gemini backend
// ============================================================================

pub struct GeminiBackend {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl GeminiBackend {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            timeout,
        }
    }

    pub fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    pub fn build_request(image: &[u8]) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(SKETCH_PROMPT.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: image_mime_type(image).to_string(),
                            data: Base64.encode(image),
                        }),
                    },
                ],
            }],
        }
    }
}

impl ImageAnalyzer for GeminiBackend {
    fn analyze(&self, image: &[u8]) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = self.url();
        let request = Self::build_request(image);

        // Built per call: a blocking client must not be created on an async worker.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| ProviderError::Request {
                endpoint: url.clone(),
                source,
            })?;

        debug!(model = %self.model, bytes = image.len(), "sending image to provider");

        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .map_err(|source| ProviderError::Request {
                endpoint: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ProviderError::Envelope(e.to_string()))?;

        parsed.first_text().map(str::to_string)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================================================
// Mock backend (for running without a provider)
// ============================================================================

/// Always answers with the same canned text.
pub struct MockImageAnalyzer {
    pub response: String,
}

impl MockImageAnalyzer {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl ImageAnalyzer for MockImageAnalyzer {
    fn analyze(&self, _image: &[u8]) -> Result<String, ProviderError> {
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Guess the MIME type from magic bytes; PNG when unknown.
pub fn image_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}
