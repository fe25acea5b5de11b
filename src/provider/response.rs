use serde::{Deserialize, Serialize};

use crate::provider::error::ProviderError;

// ============================================================================
// generateContent wire types (only the parts we read or write)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Result<&str, ProviderError> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .ok_or(ProviderError::NoCandidates)
    }
}

// ============================================================================
// Free-text cleanup
// ============================================================================

/// Remove a Markdown code fence wrapped around model output.
///
/// Handles a leading ```` ``` ```` with an optional language tag in any case
/// (```` ```json ````, ```` ```JSON ````) and a trailing ```` ``` ````; text
/// without fences is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        s = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }

    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }

    s.trim()
}
