use serde_json::json;
use sketch_enhancer::pipeline::enhance::{
    NO_IMAGE, decode_image_base64, enhance_document, enhance_image, parse_provider_text,
};
use sketch_enhancer::pipeline::error::AnalysisError;
use sketch_enhancer::provider::analyzer::{ImageAnalyzer, MockImageAnalyzer};
use sketch_enhancer::provider::error::ProviderError;
use sketch_enhancer::ui::normalizer::MERGED_CONTEXT;
use sketch_enhancer::ui::profile::NormalizeProfile;

use crate::common::fixtures::FENCED_PROVIDER_TEXT;

mod common;

struct FailingAnalyzer;

impl ImageAnalyzer for FailingAnalyzer {
    fn analyze(&self, _image: &[u8]) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

// ============================================================================
// Image decoding
// ============================================================================

#[test]
fn decodes_plain_base64() {
    assert_eq!(decode_image_base64("aGVsbG8=").unwrap(), b"hello");
}

#[test]
fn decodes_data_url() {
    assert_eq!(
        decode_image_base64("data:image/png;base64,aGVsbG8=").unwrap(),
        b"hello"
    );
}

#[test]
fn empty_image_is_missing_input() {
    for encoded in ["", "   ", "data:image/png;base64,"] {
        match decode_image_base64(encoded) {
            Err(AnalysisError::MissingInput(msg)) => assert_eq!(msg, NO_IMAGE),
            other => panic!("Expected MissingInput for {:?}, got {:?}", encoded, other),
        }
    }
}

#[test]
fn invalid_base64_is_missing_input() {
    let err = decode_image_base64("not base64 !!").unwrap_err();
    assert!(matches!(err, AnalysisError::MissingInput(ref m) if m.starts_with("Invalid image_base64")));
}

// ============================================================================
// Provider text parsing
// ============================================================================

#[test]
fn fenced_provider_text_parses() {
    let doc = parse_provider_text(FENCED_PROVIDER_TEXT).unwrap();
    assert!(doc["ui_elements"].is_array());
}

#[test]
fn uppercase_fence_tag_parses() {
    let doc = parse_provider_text("```JSON\n{\"ui_elements\": []}\n```").unwrap();
    assert_eq!(doc, json!({ "ui_elements": [] }));
}

#[test]
fn unparsable_provider_text_is_parse_error() {
    let err = parse_provider_text("```json\nSorry, I can't see a UI here.\n```").unwrap_err();
    assert!(matches!(err, AnalysisError::Parse { .. }));
    assert!(err.to_string().starts_with("JSON parse error (provider text)"));
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn enhance_document_accepts_all_document_shapes() {
    let options = NormalizeProfile::Standard.options();

    let wrapped = enhance_document(json!({ "ui_elements": [{ "type": "Text" }] }), &options).unwrap();
    let array = enhance_document(json!([{ "type": "Text" }]), &options).unwrap();
    let single = enhance_document(json!({ "type": "Text" }), &options).unwrap();

    assert_eq!(wrapped, array);
    assert_eq!(array, single);
}

#[test]
fn node_with_type_and_kind_keys_is_enhanced() {
    let out = enhance_document(
        json!([{ "type": "Text", "kind": "Text", "value": "Hi" }]),
        &NormalizeProfile::Standard.options(),
    )
    .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind.as_deref(), Some("Text"));
    assert_eq!(out[0].value.as_deref(), Some("Hi"));
}

#[test]
fn malformed_document_is_rejected_before_normalizing() {
    let err = enhance_document(json!({ "ui_elements": [1, 2] }), &Default::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedInput(_)));

    let err = enhance_document(json!({ "ui_elements": "none" }), &Default::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedInput(_)));
}

// ============================================================================
// Full path
// ============================================================================

#[test]
fn enhance_image_with_mock_provider() {
    let analyzer = MockImageAnalyzer::new(FENCED_PROVIDER_TEXT);
    let result = enhance_image(&analyzer, b"png", &NormalizeProfile::Full.options()).unwrap();

    assert_eq!(result.raw_text.as_deref(), Some(FENCED_PROVIDER_TEXT));
    assert_eq!(result.enhanced_ui.len(), 1);

    let screen = &result.enhanced_ui[0];
    assert!(screen.kind.is_none());
    assert_eq!(
        screen.context.as_deref(),
        Some("Type: Screen/main, Label: Welcome, Status: visible")
    );

    let children = screen.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].label.as_deref(), Some("Name"));
    assert_eq!(children[0].context.as_deref(), Some(MERGED_CONTEXT));
    assert_eq!(children[1].kind.as_deref(), Some("Button/primary"));
    assert_eq!(children[1].label.as_deref(), Some("Go"));
}

#[test]
fn response_body_has_enhanced_ui_and_raw_text() {
    let analyzer = MockImageAnalyzer::new("[{\"type\": \"Text\"}]");
    let result = enhance_image(&analyzer, b"png", &NormalizeProfile::Standard.options()).unwrap();
    let body = serde_json::to_value(&result).unwrap();

    assert_eq!(
        body,
        json!({
            "enhanced_ui": [{
                "type": "Text",
                "label": "Label",
                "value": "Text",
                "status": "visible",
                "context": ""
            }],
            "raw_text": "[{\"type\": \"Text\"}]"
        })
    );
}

#[test]
fn empty_image_never_reaches_provider() {
    let err = enhance_image(&FailingAnalyzer, b"", &Default::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingInput(_)));
}

#[test]
fn provider_failure_is_reported() {
    let err = enhance_image(&FailingAnalyzer, b"png", &Default::default()).unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Provider(ProviderError::Status { status: 503, .. })
    ));
    assert!(err.to_string().contains("503"));
}

#[test]
fn provider_prose_is_parse_error() {
    let analyzer = MockImageAnalyzer::new("I see a login screen.");
    let err = enhance_image(&analyzer, b"png", &Default::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse { .. }));
}
