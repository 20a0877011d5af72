//! Stored settings documents.

use crate::{scope::SettingsScope, settings_key::SettingsKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

/// Schema-free settings value: a mapping from string keys to arbitrary JSON.
pub type SettingsMap = serde_json::Map<String, serde_json::Value>;

/// A settings document persisted for one `(scope, key)` pair.
///
/// At most one document exists per pair. Writes replace the whole `value`;
/// individual fields are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// The tier (and school or branch) that owns this document.
    pub scope: SettingsScope,

    /// The settings category.
    pub key: SettingsKey,

    /// The stored value.
    pub value: SettingsMap,

    /// When the document was last written.
    pub updated_at: DateTime<Utc>,
}

impl SettingsDocument {
    /// Creates a document stamped with the current time.
    pub fn new(scope: SettingsScope, key: SettingsKey, value: SettingsMap) -> Self {
        Self {
            scope,
            key,
            value,
            updated_at: Utc::now(),
        }
    }
}
