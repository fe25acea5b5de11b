use sketch_enhancer::ui::element_model::UiElement;

pub fn text(value: &str) -> UiElement {
    UiElement::new("Text").with_value(value)
}

pub fn input(value: &str) -> UiElement {
    UiElement::new("Input/text").with_value(value)
}

/// A login popup: title, two label/input pairs, and two buttons.
pub fn login_popup() -> UiElement {
    UiElement::new("Popup/modal")
        .with_title("Sign in")
        .with_status("visible")
        .with_elements(vec![
            text("Email"),
            input("").with_status("editable"),
            text("Password"),
            input(""),
            UiElement::new("Button/primary").with_label("Login"),
            UiElement::new("Button/close").with_label("X"),
        ])
}

/// Provider answer as it usually arrives: fenced JSON with `ui_elements`.
pub const FENCED_PROVIDER_TEXT: &str = r#"```json
{
  "ui_elements": [
    {
      "type": "Screen/main",
      "title": "Welcome",
      "elements": [
        { "type": "Text", "value": "Name" },
        { "type": "Input/text", "value": "" },
        { "type": "Button/submit", "label": "Go" }
      ]
    }
  ]
}
```"#;
