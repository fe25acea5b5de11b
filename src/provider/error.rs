use std::fmt;

#[derive(Debug)]
pub enum ProviderError {
    /// No API key configured for a backend that needs one
    MissingApiKey,

    /// Building the HTTP client or sending the request failed
    Request { endpoint: String, source: reqwest::Error },

    /// Provider answered with a non-success status
    Status { status: u16, body: String },

    /// Response body was not the expected JSON envelope
    Envelope(String),

    /// Response held no candidates, or the first candidate had no text
    NoCandidates,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::MissingApiKey => {
                write!(f, "No API key configured (set GEMINI_API_KEY)")
            }
            ProviderError::Request { endpoint, source } => {
                write!(f, "Request to {} failed: {}", endpoint, source)
            }
            ProviderError::Status { status, body } => {
                write!(f, "Provider returned status {}: {}", status, body)
            }
            ProviderError::Envelope(msg) => {
                write!(f, "Unexpected provider response: {}", msg)
            }
            ProviderError::NoCandidates => {
                write!(f, "No candidates returned from provider")
            }
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}
