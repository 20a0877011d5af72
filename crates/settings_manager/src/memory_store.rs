//! In-process settings store.
//!
//! Keeps documents in a shared map. Suitable for tests and for single-process
//! deployments where settings do not need to survive a restart.

use crate::{
    document::{SettingsDocument, SettingsMap},
    scope::SettingsScope,
    settings_key::SettingsKey,
    store::SettingsStore,
    SettingsError, SettingsResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "memory_store_tests.rs"]
mod tests;

type DocumentMap = HashMap<(SettingsScope, SettingsKey), SettingsDocument>;

/// Settings store backed by an in-memory map.
///
/// Cloning the store yields another handle to the same documents.
///
/// # Examples
///
/// ```
/// use settings_manager::{InMemorySettingsStore, SettingsKey, SettingsScope, SettingsStore};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = InMemorySettingsStore::new();
/// let key = SettingsKey::try_new("email").unwrap();
///
/// assert!(store.get(&SettingsScope::Tenant, &key).await.unwrap().is_none());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    documents: Arc<RwLock<DocumentMap>>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored across all scopes.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(operation: &str) -> SettingsError {
    SettingsError::storage(operation, "in-memory store lock poisoned")
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    #[instrument(skip_all, fields(scope = %scope, key = %key))]
    async fn get(
        &self,
        scope: &SettingsScope,
        key: &SettingsKey,
    ) -> SettingsResult<Option<SettingsDocument>> {
        let documents = self.documents.read().map_err(|_| poisoned("get"))?;
        Ok(documents.get(&(scope.clone(), key.clone())).cloned())
    }

    #[instrument(skip_all, fields(scope = %scope, key = %key))]
    async fn put(
        &self,
        scope: &SettingsScope,
        key: &SettingsKey,
        value: SettingsMap,
    ) -> SettingsResult<SettingsDocument> {
        let document = SettingsDocument::new(scope.clone(), key.clone(), value);
        let mut documents = self.documents.write().map_err(|_| poisoned("put"))?;
        let replaced = documents
            .insert((scope.clone(), key.clone()), document.clone())
            .is_some();

        debug!(message = "Stored settings document", replaced = replaced);
        Ok(document)
    }

    #[instrument(skip_all, fields(scope = %scope, key = %key))]
    async fn delete(&self, scope: &SettingsScope, key: &SettingsKey) -> SettingsResult<bool> {
        let mut documents = self.documents.write().map_err(|_| poisoned("delete"))?;
        Ok(documents.remove(&(scope.clone(), key.clone())).is_some())
    }

    async fn list_keys(&self, scope: &SettingsScope) -> SettingsResult<Vec<SettingsKey>> {
        let documents = self.documents.read().map_err(|_| poisoned("list_keys"))?;
        let mut keys: Vec<SettingsKey> = documents
            .keys()
            .filter(|(s, _)| s == scope)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
