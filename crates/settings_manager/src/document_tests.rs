//! Tests for settings documents.

use super::*;
use crate::scope::ScopeId;
use serde_json::json;

#[test]
fn test_new_document_is_stamped() {
    let before = Utc::now();
    let mut value = SettingsMap::new();
    value.insert("driver".to_string(), json!("smtp"));

    let document = SettingsDocument::new(
        SettingsScope::School(ScopeId::from(1u64)),
        SettingsKey::try_new("email").unwrap(),
        value.clone(),
    );

    assert!(document.updated_at >= before);
    assert_eq!(document.value, value);
    assert_eq!(document.key.as_str(), "email");
}

#[test]
fn test_document_serialization_round_trip() {
    let document = SettingsDocument::new(
        SettingsScope::Tenant,
        SettingsKey::try_new("branding").unwrap(),
        json!({"primary_color": "#003366"})
            .as_object()
            .cloned()
            .unwrap(),
    );

    let text = serde_json::to_string(&document).unwrap();
    assert!(text.contains("\"key\":\"branding\""));

    let parsed: SettingsDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, document);
}
