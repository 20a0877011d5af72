//! Tests for settings scopes.

use super::*;

#[test]
fn test_scope_id_accepts_common_identifiers() {
    assert!(ScopeId::try_new("1").is_ok());
    assert!(ScopeId::try_new("school_12").is_ok());
    assert!(ScopeId::try_new("North-Campus").is_ok());
    assert!(ScopeId::try_new("0190f1c2-7a9b-7c3d-8e4f-123456789abc").is_ok());
}

#[test]
fn test_scope_id_rejects_invalid_identifiers() {
    assert!(ScopeId::try_new("").is_err());
    assert!(ScopeId::try_new("a/b").is_err());
    assert!(ScopeId::try_new("..").is_err());
    assert!(ScopeId::try_new("with space").is_err());
    assert!(ScopeId::try_new("x".repeat(MAX_SCOPE_ID_LENGTH + 1)).is_err());
}

#[test]
fn test_scope_id_from_integer() {
    let id = ScopeId::from(1234u64);
    assert_eq!(id.as_str(), "1234");
    assert_eq!(id.to_string(), "1234");
}

/// Verify precedence order Tenant < School < Branch.
#[test]
fn test_scope_level_precedence_order() {
    assert!(ScopeLevel::Tenant < ScopeLevel::School);
    assert!(ScopeLevel::School < ScopeLevel::Branch);

    let mut levels = vec![ScopeLevel::Branch, ScopeLevel::Tenant, ScopeLevel::School];
    levels.sort();
    assert_eq!(
        levels,
        vec![ScopeLevel::Tenant, ScopeLevel::School, ScopeLevel::Branch]
    );
}

#[test]
fn test_scope_level_parse() {
    assert_eq!("tenant".parse::<ScopeLevel>().unwrap(), ScopeLevel::Tenant);
    assert_eq!("school".parse::<ScopeLevel>().unwrap(), ScopeLevel::School);
    assert_eq!("branch".parse::<ScopeLevel>().unwrap(), ScopeLevel::Branch);
    assert!("campus".parse::<ScopeLevel>().is_err());
}

#[test]
fn test_scope_from_parts() {
    let id = ScopeId::try_new("7").unwrap();

    assert_eq!(
        SettingsScope::from_parts(ScopeLevel::Tenant, None).unwrap(),
        SettingsScope::Tenant
    );
    assert_eq!(
        SettingsScope::from_parts(ScopeLevel::School, Some(id.clone())).unwrap(),
        SettingsScope::School(id.clone())
    );
    assert_eq!(
        SettingsScope::from_parts(ScopeLevel::Branch, Some(id.clone())).unwrap(),
        SettingsScope::Branch(id.clone())
    );

    assert!(SettingsScope::from_parts(ScopeLevel::Tenant, Some(id)).is_err());
    assert!(SettingsScope::from_parts(ScopeLevel::School, None).is_err());
    assert!(SettingsScope::from_parts(ScopeLevel::Branch, None).is_err());
}

#[test]
fn test_scope_level_and_id() {
    let school = SettingsScope::School(ScopeId::from(3u64));
    assert_eq!(school.level(), ScopeLevel::School);
    assert_eq!(school.id().map(|id| id.as_str()), Some("3"));

    assert_eq!(SettingsScope::Tenant.level(), ScopeLevel::Tenant);
    assert_eq!(SettingsScope::Tenant.id(), None);
}

#[test]
fn test_scope_display() {
    assert_eq!(SettingsScope::Tenant.to_string(), "tenant");
    assert_eq!(
        SettingsScope::Branch(ScopeId::from(9u64)).to_string(),
        "branch:9"
    );
}

#[test]
fn test_scope_serialization() {
    let scope = SettingsScope::School(ScopeId::from(5u64));
    let json = serde_json::to_value(&scope).unwrap();
    assert_eq!(json, serde_json::json!({"level": "school", "id": "5"}));

    let tenant = serde_json::to_value(SettingsScope::Tenant).unwrap();
    assert_eq!(tenant, serde_json::json!({"level": "tenant"}));

    let back: SettingsScope = serde_json::from_value(json).unwrap();
    assert_eq!(back, scope);
}
