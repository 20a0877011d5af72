//! Shared helpers for unit tests.

use crate::{
    document::{SettingsDocument, SettingsMap},
    scope::SettingsScope,
    settings_key::SettingsKey,
    store::SettingsStore,
    SettingsError, SettingsResult,
};
use async_trait::async_trait;
use serde_json::Value;

pub(crate) fn key(name: &str) -> SettingsKey {
    SettingsKey::try_new(name).unwrap()
}

pub(crate) fn map(value: Value) -> SettingsMap {
    value.as_object().cloned().unwrap()
}

/// Store whose every operation fails, as if the database were unreachable.
#[derive(Debug, Clone, Default)]
pub(crate) struct UnavailableStore;

#[async_trait]
impl SettingsStore for UnavailableStore {
    async fn get(
        &self,
        _scope: &SettingsScope,
        _key: &SettingsKey,
    ) -> SettingsResult<Option<SettingsDocument>> {
        Err(SettingsError::storage("get", "connection refused"))
    }

    async fn put(
        &self,
        _scope: &SettingsScope,
        _key: &SettingsKey,
        _value: SettingsMap,
    ) -> SettingsResult<SettingsDocument> {
        Err(SettingsError::storage("put", "connection refused"))
    }

    async fn delete(&self, _scope: &SettingsScope, _key: &SettingsKey) -> SettingsResult<bool> {
        Err(SettingsError::storage("delete", "connection refused"))
    }

    async fn list_keys(&self, _scope: &SettingsScope) -> SettingsResult<Vec<SettingsKey>> {
        Err(SettingsError::storage("list_keys", "connection refused"))
    }
}
