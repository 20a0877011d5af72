//! Tests for the settings merging engine.

use super::*;
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn key() -> SettingsKey {
    SettingsKey::try_new("email").unwrap()
}

fn map(value: Value) -> SettingsMap {
    value.as_object().cloned().unwrap()
}

fn merge(layers: Vec<(ScopeLevel, Value)>) -> ResolvedSettings {
    let layers = layers.into_iter().map(|(l, v)| (l, map(v))).collect();
    SettingsMerger::new().merge_layers(key(), layers)
}

// ============================================================================
// Basic Merging Tests
// ============================================================================

#[test]
fn test_merger_default() {
    let merger = SettingsMerger::default();
    assert!(format!("{:?}", merger).contains("SettingsMerger"));
}

#[test]
fn test_merge_no_layers_is_empty() {
    let resolved = SettingsMerger::new().merge_layers(key(), Vec::new());
    assert!(resolved.is_empty());
    assert_eq!(resolved.key, key());
}

/// School value overrides tenant value for matching keys only.
#[test]
fn test_school_overrides_tenant() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"a": 1, "b": 2})),
        (ScopeLevel::School, json!({"b": 3})),
    ]);

    assert_eq!(Value::Object(resolved.values.clone()), json!({"a": 1, "b": 3}));
    assert_eq!(resolved.source_of("a"), Some(ScopeLevel::Tenant));
    assert_eq!(resolved.source_of("b"), Some(ScopeLevel::School));
}

#[test]
fn test_branch_overrides_school() {
    let resolved = merge(vec![
        (ScopeLevel::School, json!({"x": 1})),
        (ScopeLevel::Branch, json!({"x": 2})),
    ]);

    assert_eq!(Value::Object(resolved.values.clone()), json!({"x": 2}));
    assert_eq!(resolved.source_of("x"), Some(ScopeLevel::Branch));
}

/// Layer order in the input does not matter; precedence is fixed.
#[test]
fn test_layers_applied_in_precedence_order() {
    let resolved = merge(vec![
        (ScopeLevel::Branch, json!({"x": "branch"})),
        (ScopeLevel::Tenant, json!({"x": "tenant", "y": "tenant"})),
        (ScopeLevel::School, json!({"x": "school", "y": "school"})),
    ]);

    assert_eq!(
        Value::Object(resolved.values.clone()),
        json!({"x": "branch", "y": "school"})
    );
}

// ============================================================================
// Deep Merge Tests
// ============================================================================

#[test]
fn test_nested_mappings_merge_recursively() {
    let resolved = merge(vec![
        (
            ScopeLevel::Tenant,
            json!({"smtp": {"host": "mail.tenant.org", "port": 25, "auth": {"user": "t", "pass": "p"}}}),
        ),
        (ScopeLevel::School, json!({"smtp": {"port": 587, "auth": {"user": "s"}}})),
    ]);

    assert_eq!(
        Value::Object(resolved.values.clone()),
        json!({"smtp": {"host": "mail.tenant.org", "port": 587, "auth": {"user": "s", "pass": "p"}}})
    );
    assert_eq!(resolved.source_of("smtp.host"), Some(ScopeLevel::Tenant));
    assert_eq!(resolved.source_of("smtp.port"), Some(ScopeLevel::School));
    assert_eq!(resolved.source_of("smtp.auth.user"), Some(ScopeLevel::School));
    assert_eq!(resolved.source_of("smtp.auth.pass"), Some(ScopeLevel::Tenant));
}

/// Arrays are replaced wholesale, never concatenated or merged by index.
#[test]
fn test_arrays_are_replaced() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"grades": ["A", "B", "C"]})),
        (ScopeLevel::School, json!({"grades": ["X"]})),
    ]);

    assert_eq!(resolved.get("grades"), Some(&json!(["X"])));
    assert_eq!(resolved.source_of("grades"), Some(ScopeLevel::School));
}

#[test]
fn test_scalar_replaces_mapping_and_mapping_replaces_scalar() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"a": {"nested": 1}, "b": 5})),
        (ScopeLevel::School, json!({"a": "flat", "b": {"nested": 2}})),
    ]);

    assert_eq!(
        Value::Object(resolved.values.clone()),
        json!({"a": "flat", "b": {"nested": 2}})
    );
    assert_eq!(resolved.source_of("a"), Some(ScopeLevel::School));
    assert_eq!(resolved.source_of("a.nested"), None);
    assert_eq!(resolved.source_of("b.nested"), Some(ScopeLevel::School));
    assert_eq!(resolved.source_of("b"), None);
}

/// A field whose name contains a dot is traced separately from a nested path.
#[test]
fn test_dotted_field_name_survives_replacement_of_sibling() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"smtp": 1, "smtp.port": 2})),
        (ScopeLevel::School, json!({"smtp": {"port": 25}})),
    ]);

    assert_eq!(resolved.source_of(r"smtp\.port"), Some(ScopeLevel::Tenant));
    assert_eq!(resolved.get(r"smtp\.port"), Some(&json!(2)));
    assert_eq!(resolved.source_of("smtp.port"), Some(ScopeLevel::School));
    assert_eq!(resolved.get("smtp.port"), Some(&json!(25)));
    assert_eq!(resolved.source_trace.len(), 2);
}

// ============================================================================
// Null Handling Tests
// ============================================================================

/// A null override does not clear the tenant value.
#[test]
fn test_null_override_inherits() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"a": 1})),
        (ScopeLevel::School, json!({"a": null, "b": 5})),
    ]);

    assert_eq!(resolved.get("a"), Some(&json!(1)));
    assert_eq!(resolved.get("b"), Some(&json!(5)));
    assert_eq!(resolved.source_of("a"), Some(ScopeLevel::Tenant));
}

#[test]
fn test_null_override_without_base_leaves_field_unset() {
    let resolved = merge(vec![(ScopeLevel::School, json!({"a": null}))]);
    assert!(resolved.is_empty());
}

#[test]
fn test_nested_null_override_inherits() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"smtp": {"host": "h", "port": 25}})),
        (ScopeLevel::Branch, json!({"smtp": {"host": null, "port": 2525}})),
    ]);

    assert_eq!(resolved.get("smtp.host"), Some(&json!("h")));
    assert_eq!(resolved.get("smtp.port"), Some(&json!(2525)));
}

#[test]
fn test_nulls_inside_replacement_mapping_are_dropped() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"smtp": "disabled"})),
        (ScopeLevel::School, json!({"smtp": {"host": "h", "user": null}})),
    ]);

    assert_eq!(resolved.get("smtp"), Some(&json!({"host": "h"})));
}

#[test]
fn test_nulls_inside_arrays_are_kept() {
    let resolved = merge(vec![(ScopeLevel::School, json!({"slots": [1, null, 3]}))]);
    assert_eq!(resolved.get("slots"), Some(&json!([1, null, 3])));
}

/// The tenant document is the base and is taken as stored.
#[test]
fn test_tenant_nulls_are_kept() {
    let resolved = merge(vec![(ScopeLevel::Tenant, json!({"a": null}))]);
    assert_eq!(resolved.get("a"), Some(&Value::Null));
    assert_eq!(resolved.source_of("a"), Some(ScopeLevel::Tenant));
}

#[test]
fn test_empty_mapping_is_a_leaf() {
    let resolved = merge(vec![
        (ScopeLevel::Tenant, json!({"extras": {"k": 1}})),
        (ScopeLevel::School, json!({"meta": {}})),
    ]);

    assert_eq!(resolved.get("meta"), Some(&json!({})));
    assert_eq!(resolved.source_of("meta"), Some(ScopeLevel::School));
    assert_eq!(resolved.source_of("extras.k"), Some(ScopeLevel::Tenant));
}

/// Merging an empty school mapping over the tenant keeps the tenant value intact.
#[test]
fn test_empty_override_is_identity() {
    let tenant = json!({"driver": "smtp", "smtp": {"port": 25}});
    let resolved = merge(vec![
        (ScopeLevel::Tenant, tenant.clone()),
        (ScopeLevel::School, json!({})),
        (ScopeLevel::Branch, json!({})),
    ]);

    assert_eq!(Value::Object(resolved.values), tenant);
}
