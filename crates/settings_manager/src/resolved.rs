//! Resolved settings representing the effective value of one settings key.
//!
//! `ResolvedSettings` is the result of merging the tenant, school and branch
//! documents for a key. It is computed on every read and never cached.
//!
//! # Source Tracing
//!
//! Each leaf value carries the tier that supplied it, keyed by its dotted path
//! (for example `smtp.port`). This is what the CLI prints with `--trace` and
//! what audit logging uses to explain where a value came from.
//!
//! Documents are free-form, so a field name may itself contain a dot. Such a
//! dot is written as `\.` in a path (and a backslash as `\\`): the literal
//! field `"smtp.port"` is traced as `smtp\.port`, distinct from the nested
//! path `smtp.port`.
//!
//! # Examples
//!
//! ```rust
//! use settings_manager::{ScopeLevel, SettingsKey, SettingsMerger};
//! use serde_json::json;
//!
//! let merger = SettingsMerger::new();
//! let key = SettingsKey::try_new("email").unwrap();
//! let tenant = json!({"driver": "smtp", "from_name": "Tenant"}).as_object().cloned().unwrap();
//! let school = json!({"from_name": "School A"}).as_object().cloned().unwrap();
//!
//! let resolved = merger.merge_layers(
//!     key,
//!     vec![(ScopeLevel::Tenant, tenant), (ScopeLevel::School, school)],
//! );
//!
//! assert_eq!(resolved.get("from_name"), Some(&json!("School A")));
//! assert_eq!(resolved.source_of("driver"), Some(ScopeLevel::Tenant));
//! assert_eq!(resolved.source_of("from_name"), Some(ScopeLevel::School));
//! ```

use crate::{
    document::SettingsMap, scope::ScopeLevel, settings_key::SettingsKey, SettingsError,
    SettingsResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[cfg(test)]
#[path = "resolved_tests.rs"]
mod tests;

/// The effective settings for one key after merging every applicable tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSettings {
    /// The settings key that was resolved.
    pub key: SettingsKey,

    /// The merged mapping. Empty when no tier has a document.
    pub values: SettingsMap,

    /// Tier that supplied each leaf value.
    pub source_trace: SettingsSourceTrace,
}

impl ResolvedSettings {
    /// Creates an empty result for a key.
    pub fn empty(key: SettingsKey) -> Self {
        Self {
            key,
            values: SettingsMap::new(),
            source_trace: SettingsSourceTrace::new(),
        }
    }

    /// Looks up a value by dotted path, descending through nested mappings.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = split_field_path(path).into_iter();
        let first = segments.next()?;
        let mut current = self.values.get(&first)?;
        for segment in segments {
            current = current.as_object()?.get(&segment)?;
        }
        Some(current)
    }

    /// Returns the tier that supplied the leaf at `path`.
    pub fn source_of(&self, path: &str) -> Option<ScopeLevel> {
        self.source_trace.get_source(path)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decodes the merged mapping into a typed representation.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Decode` if the merged document does not fit `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> SettingsResult<T> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            SettingsError::Decode {
                key: self.key.to_string(),
                reason: e.to_string(),
            }
        })
    }

    pub fn into_values(self) -> SettingsMap {
        self.values
    }
}

/// Tracks which tier provided each leaf value of a resolved document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SettingsSourceTrace {
    /// Map of dotted field path to tier.
    sources: HashMap<String, ScopeLevel>,
}

impl SettingsSourceTrace {
    /// Creates a new empty source trace.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Records the tier of a leaf value.
    pub fn add_source(&mut self, field_path: &str, source: ScopeLevel) {
        self.sources.insert(field_path.to_string(), source);
    }

    pub fn get_source(&self, field_path: &str) -> Option<ScopeLevel> {
        self.sources.get(field_path).copied()
    }

    /// Forgets `field_path` and every path nested below it.
    pub fn remove_subtree(&mut self, field_path: &str) {
        let nested_prefix = format!("{}.", field_path);
        self.sources
            .retain(|path, _| path != field_path && !path.starts_with(&nested_prefix));
    }

    /// Returns every traced path with its tier, sorted by path.
    pub fn entries(&self) -> Vec<(&str, ScopeLevel)> {
        let mut entries: Vec<(&str, ScopeLevel)> = self
            .sources
            .iter()
            .map(|(path, level)| (path.as_str(), *level))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Appends `field` to a trace path, escaping dots and backslashes in the
/// field name.
pub(crate) fn join_field_path(prefix: &str, field: &str) -> String {
    let mut path = String::with_capacity(prefix.len() + field.len() + 1);
    if !prefix.is_empty() {
        path.push_str(prefix);
        path.push('.');
    }
    for c in field.chars() {
        if c == '.' || c == '\\' {
            path.push('\\');
        }
        path.push(c);
    }
    path
}

/// Splits a trace path into field names, undoing [`join_field_path`] escapes.
fn split_field_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);
    segments
}
