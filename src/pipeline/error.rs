use std::fmt;

use crate::provider::error::ProviderError;
use crate::ui::error::ElementError;

#[derive(Debug)]
pub enum AnalysisError {
    /// No image or payload supplied, or it could not be decoded
    MissingInput(String),

    /// Image-analysis provider failed or returned no candidates
    Provider(ProviderError),

    /// Provider text is not valid JSON after fence stripping
    Parse { context: String, source: serde_json::Error },

    /// Decoded tree violates the normalizer's input contract
    MalformedInput(ElementError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingInput(msg) => write!(f, "{}", msg),
            AnalysisError::Provider(e) => write!(f, "Provider error: {}", e),
            AnalysisError::Parse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            AnalysisError::MalformedInput(e) => write!(f, "Malformed UI elements: {}", e),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Provider(e) => Some(e),
            AnalysisError::Parse { source, .. } => Some(source),
            AnalysisError::MalformedInput(e) => Some(e),
            AnalysisError::MissingInput(_) => None,
        }
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(e: ProviderError) -> Self {
        AnalysisError::Provider(e)
    }
}

impl From<ElementError> for AnalysisError {
    fn from(e: ElementError) -> Self {
        AnalysisError::MalformedInput(e)
    }
}
