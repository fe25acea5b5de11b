// The `type` tag is free-form text coming back from a model, so it is
// classified by predicates rather than matched against a closed enum.

pub const TEXT: &str = "Text";
pub const INPUT_TEXT: &str = "Input/text";
pub const BUTTON_PRIMARY: &str = "Button/primary";
pub const BUTTON_CLOSE: &str = "Button/close";

const CONTAINER_KINDS: [&str; 3] = ["screen/main", "popup/modal", "popup/bottom"];

pub fn is_text(kind: &str) -> bool {
    kind == TEXT
}

pub fn is_input(kind: &str) -> bool {
    kind.starts_with("Input")
}

pub fn is_button(kind: &str) -> bool {
    kind.starts_with("Button")
}

pub fn mentions_close(kind: &str) -> bool {
    kind.to_lowercase().contains("close")
}

/// Screens and popups, compared case-insensitively.
pub fn is_container(kind: &str) -> bool {
    let lower = kind.to_lowercase();
    CONTAINER_KINDS.contains(&lower.as_str())
}

/// Collapse any `Button*` tag onto one of the two canonical button kinds.
/// Non-button tags are returned unchanged.
pub fn canonical_kind(kind: &str) -> &str {
    if !is_button(kind) {
        return kind;
    }

    if mentions_close(kind) {
        BUTTON_CLOSE
    } else {
        BUTTON_PRIMARY
    }
}

/// Value used when a node arrives without one.
pub fn default_value(kind: &str) -> Option<&'static str> {
    if is_text(kind) {
        Some("Text")
    } else if is_input(kind) {
        Some("")
    } else if is_button(kind) {
        Some("Submit")
    } else {
        None
    }
}
