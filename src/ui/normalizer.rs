use crate::ui::element_model::UiElement;
use crate::ui::kind::{self, INPUT_TEXT, TEXT};
use crate::ui::profile::NormalizeOptions;

pub const MERGED_CONTEXT: &str = "Label and input combined";

const DEFAULT_LABEL: &str = "Label";
const DEFAULT_STATUS: &str = "visible";
const MERGED_STATUS: &str = "editable";

/// A node with kind and label resolved, children already normalized.
/// `value` and `status` stay as given so the merge step can tell an explicit
/// value from a default.
#[derive(Debug)]
struct Resolved {
    kind: String,
    label: String,
    value: Option<String>,
    status: Option<String>,
    context: String,
    elements: Option<Vec<UiElement>>,
}

/// Canonicalize a sequence of sibling elements.
///
/// Returns a new tree; the input is never touched. `is_root` marks the
/// top-level call and only matters for container folding.
pub fn normalize(nodes: &[UiElement], is_root: bool, options: &NormalizeOptions) -> Vec<UiElement> {
    let resolved: Vec<Resolved> = nodes.iter().map(|node| resolve(node, options)).collect();

    let resolved = if options.merge_label_inputs {
        merge_label_inputs(resolved)
    } else {
        resolved
    };

    resolved
        .into_iter()
        .map(|node| emit(node, is_root, options))
        .collect()
}

fn resolve(node: &UiElement, options: &NormalizeOptions) -> Resolved {
    let given_kind = non_empty(node.kind.as_deref()).unwrap_or(TEXT);

    let label = non_empty(node.label.as_deref())
        .or_else(|| non_empty(node.title.as_deref()))
        .unwrap_or(DEFAULT_LABEL)
        .to_string();

    Resolved {
        kind: kind::canonical_kind(given_kind).to_string(),
        label,
        value: node.value.clone(),
        status: node.status.clone(),
        context: node.context.clone().unwrap_or_default(),
        elements: node
            .elements
            .as_ref()
            .map(|children| normalize(children, false, options)),
    }
}

/// Single left-to-right pass; each node takes part in at most one merge.
fn merge_label_inputs(nodes: Vec<Resolved>) -> Vec<Resolved> {
    let mut merged = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();

    while let Some(node) = iter.next() {
        if kind::is_text(&node.kind) {
            if let Some(input) = iter.next_if(is_mergeable_input) {
                merged.push(combine(node, input));
                continue;
            }
        }
        merged.push(node);
    }

    merged
}

// An input that already absorbed its label is left alone, so a second pass
// over normalized output makes no further merges.
fn is_mergeable_input(node: &Resolved) -> bool {
    node.kind == INPUT_TEXT && node.context != MERGED_CONTEXT
}

fn combine(label_node: Resolved, input: Resolved) -> Resolved {
    let label = non_empty(label_node.value.as_deref())
        .unwrap_or(DEFAULT_LABEL)
        .to_string();

    Resolved {
        kind: INPUT_TEXT.to_string(),
        label,
        value: Some(input.value.unwrap_or_default()),
        status: Some(input.status.unwrap_or_else(|| MERGED_STATUS.to_string())),
        context: MERGED_CONTEXT.to_string(),
        // Text and Input/text are leaf kinds; the merged input is always a leaf.
        elements: None,
    }
}

fn emit(node: Resolved, is_root: bool, options: &NormalizeOptions) -> UiElement {
    let value = node
        .value
        .or_else(|| kind::default_value(&node.kind).map(String::from));

    if options.fold_containers && (is_root || kind::is_container(&node.kind)) {
        let status = node.status.as_deref().unwrap_or(DEFAULT_STATUS);
        let context = format!(
            "{} Type: {}, Label: {}, Status: {}",
            node.context, node.kind, node.label, status
        );

        return UiElement {
            context: Some(context.trim().to_string()),
            value,
            elements: node.elements,
            ..UiElement::default()
        };
    }

    let status = if options.emit_status {
        Some(node.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()))
    } else {
        None
    };

    UiElement {
        kind: Some(node.kind),
        label: Some(node.label),
        title: None,
        value,
        status,
        context: Some(node.context),
        elements: node.elements,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
