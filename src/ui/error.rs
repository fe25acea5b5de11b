use std::fmt;

/// The decoded tree violates the normalizer's input contract.
#[derive(Debug)]
pub enum ElementError {
    /// A node is not a JSON object
    NotARecord { path: String, found: &'static str },

    /// `elements` (or the top-level sequence) is not a JSON array
    NotASequence { path: String, found: &'static str },

    /// A scalar field has the wrong type (e.g. `label` is a number)
    Field { path: String, source: serde_json::Error },
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementError::NotARecord { path, found } => {
                write!(f, "{} must be an object, found {}", path, found)
            }
            ElementError::NotASequence { path, found } => {
                write!(f, "{} must be an array, found {}", path, found)
            }
            ElementError::Field { path, source } => {
                write!(f, "invalid field in {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ElementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ElementError::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}
