//! Settings store interface.
//!
//! Durable persistence of settings documents keyed by `(scope, key)`. The
//! store performs no validation; callers hand it data that already passed the
//! validation boundary.
//!
//! Implementations must be safe for concurrent readers and writers. Concurrent
//! writes to the same pair follow last-write-wins semantics. Implementations
//! must not hold an in-process lock across an `.await` point.

use crate::{
    document::{SettingsDocument, SettingsMap},
    scope::SettingsScope,
    settings_key::SettingsKey,
    SettingsResult,
};
use async_trait::async_trait;

/// Abstract interface for settings persistence.
///
/// # Errors
///
/// Every operation returns `SettingsError::Storage` when the underlying
/// persistence is unavailable. A missing document is not an error.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the document stored for a scope and key.
    ///
    /// Returns `Ok(None)` if the pair was never written or has been deleted.
    async fn get(
        &self,
        scope: &SettingsScope,
        key: &SettingsKey,
    ) -> SettingsResult<Option<SettingsDocument>>;

    /// Creates or replaces the document for a scope and key.
    ///
    /// Returns the document as stored, including its new timestamp.
    async fn put(
        &self,
        scope: &SettingsScope,
        key: &SettingsKey,
        value: SettingsMap,
    ) -> SettingsResult<SettingsDocument>;

    /// Removes the document for a scope and key.
    ///
    /// Returns `true` if a document was removed and `false` if there was
    /// nothing to remove. Deleting a missing document is not an error.
    async fn delete(&self, scope: &SettingsScope, key: &SettingsKey) -> SettingsResult<bool>;

    /// Lists the keys that have a document at the given scope, sorted.
    async fn list_keys(&self, scope: &SettingsScope) -> SettingsResult<Vec<SettingsKey>>;
}
