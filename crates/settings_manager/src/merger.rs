//! Settings merging engine.
//!
//! Combines the documents stored for one settings key at each tier into the
//! effective value a consumer sees.
//!
//! # Settings Hierarchy
//!
//! The merge follows a fixed precedence order from lowest to highest:
//! 1. **Tenant** - System-wide defaults
//! 2. **School** - School-specific overrides
//! 3. **Branch** - Branch-specific overrides (highest precedence)
//!
//! The order is not configurable per call.
//!
//! # Merge Rules
//!
//! - Mappings present on both sides are merged key by key, recursively.
//! - Any other value (scalar, array, or a mapping replacing a non-mapping)
//!   replaces the lower tier's value outright. Arrays are never concatenated.
//! - An explicit `null` in a school or branch document means "inherit": the
//!   field is skipped and the lower tier's value stays in effect. This holds at
//!   every nesting depth.
//! - The tenant document is the base and is taken as stored, nulls included.

use crate::{
    document::SettingsMap,
    resolved::{join_field_path, ResolvedSettings, SettingsSourceTrace},
    scope::ScopeLevel,
    settings_key::SettingsKey,
};
use serde_json::Value;

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// Settings merging engine.
///
/// This is a stateless component: it takes documents and produces a merged
/// result without keeping any state between calls.
#[derive(Debug, Clone, Default)]
pub struct SettingsMerger {}

impl SettingsMerger {
    pub fn new() -> Self {
        Self {}
    }

    /// Merges the documents of one settings key.
    ///
    /// `layers` may be supplied in any order; they are applied in ascending
    /// precedence. Missing tiers are simply absent from `layers`. If two layers
    /// share a level, the later one in `layers` wins.
    pub fn merge_layers(
        &self,
        key: SettingsKey,
        mut layers: Vec<(ScopeLevel, SettingsMap)>,
    ) -> ResolvedSettings {
        layers.sort_by_key(|(level, _)| *level);

        let mut resolved = ResolvedSettings::empty(key);
        for (level, document) in layers {
            if level == ScopeLevel::Tenant {
                for (field, value) in document {
                    let path = join_field_path("", &field);
                    resolved.source_trace.remove_subtree(&path);
                    record_value(&mut resolved.source_trace, &path, &value, level);
                    resolved.values.insert(field, value);
                }
            } else {
                overlay(
                    &mut resolved.values,
                    document,
                    level,
                    "",
                    &mut resolved.source_trace,
                );
            }
        }

        resolved
    }
}

/// Deep-merges `overlay` into `base`, skipping null overrides.
fn overlay(
    base: &mut SettingsMap,
    overlay_map: SettingsMap,
    level: ScopeLevel,
    prefix: &str,
    trace: &mut SettingsSourceTrace,
) {
    for (field, value) in overlay_map {
        if value.is_null() {
            continue;
        }

        let path = join_field_path(prefix, &field);

        let value = match value {
            Value::Object(overlay_child) => match base.get_mut(&field) {
                Some(Value::Object(base_child)) => {
                    overlay(base_child, overlay_child, level, &path, trace);
                    continue;
                }
                _ => Value::Object(overlay_child),
            },
            other => other,
        };

        let value = strip_nulls(value);
        trace.remove_subtree(&path);
        record_value(trace, &path, &value, level);
        base.insert(field, value);
    }
}

/// Removes null members from mappings nested inside a replacement value.
///
/// With nothing underneath to inherit from, a null override simply leaves the
/// field unset. Array elements are left untouched.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        other => other,
    }
}

fn record_leaves(
    trace: &mut SettingsSourceTrace,
    prefix: &str,
    map: &SettingsMap,
    level: ScopeLevel,
) {
    for (field, value) in map {
        let path = join_field_path(prefix, field);
        record_value(trace, &path, value, level);
    }
}

fn record_value(trace: &mut SettingsSourceTrace, path: &str, value: &Value, level: ScopeLevel) {
    match value {
        Value::Object(map) if !map.is_empty() => record_leaves(trace, path, map, level),
        _ => trace.add_source(path, level),
    }
}

