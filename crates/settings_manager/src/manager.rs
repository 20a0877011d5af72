//! School settings manager.
//!
//! This module implements the orchestration component callers use to read
//! and write settings. The `SchoolSettingsManager` ties together:
//! - `SettingsResolver` for hierarchical resolution
//! - a `SettingsValidator` at the write boundary
//! - `SettingsWriter` and `SettingsResetter` for scope-level changes
//!
//! # Usage
//!
//! ```rust
//! use settings_manager::{
//!     InMemorySettingsStore, SchoolSettingsManager, ScopeId, SettingsContext, SettingsKey,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let manager = SchoolSettingsManager::new(Arc::new(InMemorySettingsStore::new()));
//! let key = SettingsKey::try_new("email")?;
//!
//! manager
//!     .save_tenant_default(&key, json!({"driver": "smtp", "from_name": "Tenant Default"}))
//!     .await?;
//!
//! let school_a = SettingsContext::new(ScopeId::from(1u64));
//! manager.save(&key, json!({"from_name": "School A"}), &school_a).await?;
//!
//! let resolved = manager.resolve(&key, &school_a).await?;
//! assert_eq!(resolved.get("from_name"), Some(&json!("School A")));
//! assert_eq!(resolved.get("driver"), Some(&json!("smtp")));
//! # Ok::<(), settings_manager::SettingsError>(())
//! # }).unwrap();
//! ```

use crate::{
    categories::SettingsCategory,
    context::SettingsContext,
    document::SettingsDocument,
    resetter::SettingsResetter,
    resolved::ResolvedSettings,
    resolver::SettingsResolver,
    scope::SettingsScope,
    settings_key::SettingsKey,
    store::SettingsStore,
    validator::{SettingsValidator, StructuralValidator, ValidatedSettings},
    writer::SettingsWriter,
    SettingsError, SettingsResult,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;

/// School settings manager.
///
/// Stateless apart from the store it wraps: every read goes to the store and
/// every write is visible to the next read. Cheap to clone and safe to share
/// across request handlers.
#[derive(Clone)]
pub struct SchoolSettingsManager {
    store: Arc<dyn SettingsStore>,
    resolver: SettingsResolver,
    writer: SettingsWriter,
    resetter: SettingsResetter,
    validator: Arc<dyn SettingsValidator>,
}

impl SchoolSettingsManager {
    /// Creates a manager that only applies the structural check on writes.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_validator(store, Arc::new(StructuralValidator))
    }

    /// Creates a manager that validates writes with `validator`.
    pub fn with_validator(
        store: Arc<dyn SettingsStore>,
        validator: Arc<dyn SettingsValidator>,
    ) -> Self {
        Self {
            resolver: SettingsResolver::new(store.clone()),
            writer: SettingsWriter::new(store.clone()),
            resetter: SettingsResetter::new(store.clone()),
            store,
            validator,
        }
    }

    /// Resolves the effective settings for `key` in `context`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Storage` if the store is unavailable. Callers
    /// should present this as "settings unavailable" rather than failing the page.
    pub async fn resolve(
        &self,
        key: &SettingsKey,
        context: &SettingsContext,
    ) -> SettingsResult<ResolvedSettings> {
        self.resolver.resolve(key, context).await
    }

    /// Resolves and decodes a typed settings category.
    pub async fn resolve_category<C: SettingsCategory>(
        &self,
        context: &SettingsContext,
    ) -> SettingsResult<C> {
        self.resolver.resolve_category::<C>(context).await
    }

    /// Validates `value` and saves it at the most specific scope of `context`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::ValidationFailed` if `value` is rejected (nothing
    /// is written), or `SettingsError::Storage` if persisting fails.
    #[instrument(skip_all, fields(key = %key, scope = %context.target_scope()))]
    pub async fn save(
        &self,
        key: &SettingsKey,
        value: Value,
        context: &SettingsContext,
    ) -> SettingsResult<SettingsDocument> {
        let validated = self.validate(key, value)?;
        self.writer.save(context, validated).await
    }

    /// Serializes a typed category value, validates it, and saves it.
    pub async fn save_category<C: SettingsCategory>(
        &self,
        settings: &C,
        context: &SettingsContext,
    ) -> SettingsResult<SettingsDocument> {
        let key = SettingsKey::try_new(C::KEY)?;
        let value = encode(&key, settings)?;
        self.save(&key, value, context).await
    }

    /// Validates `value` and replaces the tenant-wide default for `key`.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn save_tenant_default(
        &self,
        key: &SettingsKey,
        value: Value,
    ) -> SettingsResult<SettingsDocument> {
        let validated = self.validate(key, value)?;
        self.writer.save_tenant_default(validated).await
    }

    /// Removes the override for `key` at the most specific scope of `context`.
    pub async fn reset(&self, key: &SettingsKey, context: &SettingsContext) -> SettingsResult<()> {
        self.resetter.reset(key, context).await
    }

    /// Removes the tenant-wide default for `key`.
    pub async fn reset_tenant_default(&self, key: &SettingsKey) -> SettingsResult<()> {
        self.resetter.reset_tenant_default(key).await
    }

    /// Lists the keys with a document at `scope`.
    pub async fn list_overrides(&self, scope: &SettingsScope) -> SettingsResult<Vec<SettingsKey>> {
        self.store.list_keys(scope).await
    }

    /// Loads the raw document stored at one scope, without merging.
    pub async fn document(
        &self,
        key: &SettingsKey,
        scope: &SettingsScope,
    ) -> SettingsResult<Option<SettingsDocument>> {
        self.store.get(scope, key).await
    }

    fn validate(&self, key: &SettingsKey, value: Value) -> SettingsResult<ValidatedSettings> {
        match ValidatedSettings::validate(key.clone(), value, self.validator.as_ref()) {
            Ok(validated) => {
                debug!(message = "Settings passed validation", key = %key);
                Ok(validated)
            }
            Err(e) => {
                warn!(message = "Settings rejected", key = %key, error = %e);
                Err(e)
            }
        }
    }
}

fn encode<C: SettingsCategory>(key: &SettingsKey, settings: &C) -> SettingsResult<Value> {
    serde_json::to_value(settings).map_err(|e| SettingsError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
