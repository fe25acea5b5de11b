use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ui::error::ElementError;

// ============================================================================
// UI element tree as described by the image-analysis provider
// ============================================================================

/// One node of a sketched interface.
///
/// Every field is optional: the provider output is loosely structured and the
/// normalizer decides which fields are defaulted and which are dropped.
/// The tag travels as `type` on the wire; `kind` is accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiElement {
    #[serde(
        rename = "type",
        alias = "kind",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Children; only containers carry these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<UiElement>>,
}

impl UiElement {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn with_elements(mut self, elements: Vec<UiElement>) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn children(&self) -> &[UiElement] {
        self.elements.as_deref().unwrap_or(&[])
    }
}

/// Total number of nodes in a forest, children included.
pub fn count_nodes(nodes: &[UiElement]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_nodes(node.children()))
        .sum()
}

// ============================================================================
// Decoding from a parsed JSON document
// ============================================================================

/// Pick the element sequence out of a decoded document.
///
/// `{"ui_elements": [...]}` yields the inner value, a bare array is used as
/// is, anything else is treated as a single root node.
pub fn element_sequence(document: Value) -> Value {
    match document {
        Value::Object(mut map) if map.contains_key("ui_elements") => {
            map.remove("ui_elements").unwrap_or(Value::Null)
        }
        Value::Array(_) => document,
        other => Value::Array(vec![other]),
    }
}

/// Decode a sequence of element records, failing on the first node that is
/// not a record or whose `elements` is not a sequence.
pub fn decode_elements(sequence: Value) -> Result<Vec<UiElement>, ElementError> {
    let items = match sequence {
        Value::Array(items) => items,
        other => {
            return Err(ElementError::NotASequence {
                path: "ui_elements".to_string(),
                found: json_type_name(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| decode_node(item, &format!("ui_elements[{}]", i)))
        .collect()
}

fn decode_node(item: Value, path: &str) -> Result<UiElement, ElementError> {
    let mut map = match item {
        Value::Object(map) => map,
        other => {
            return Err(ElementError::NotARecord {
                path: path.to_string(),
                found: json_type_name(&other),
            });
        }
    };

    // Children are checked here so errors carry the full path.
    let children = match map.remove("elements") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .enumerate()
                .map(|(i, child)| decode_node(child, &format!("{}.elements[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(other) => {
            return Err(ElementError::NotASequence {
                path: format!("{}.elements", path),
                found: json_type_name(&other),
            });
        }
    };

    // `kind` only stands in for a missing or empty `type`.
    let alt_kind: Option<String> = match map.remove("kind") {
        None => None,
        Some(value) => serde_json::from_value(value).map_err(|source| ElementError::Field {
            path: path.to_string(),
            source,
        })?,
    };

    let mut node: UiElement =
        serde_json::from_value(Value::Object(map)).map_err(|source| ElementError::Field {
            path: path.to_string(),
            source,
        })?;
    if node.kind.as_deref().is_none_or(str::is_empty) {
        if let Some(kind) = alt_kind {
            node.kind = Some(kind);
        }
    }
    node.elements = children;
    Ok(node)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
