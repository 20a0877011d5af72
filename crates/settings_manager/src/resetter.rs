//! Settings override removal.
//!
//! Removing a school or branch document makes resolution fall back to the
//! next lower tier. Resetting a scope that has no override is a no-op.

use crate::{
    context::SettingsContext, scope::SettingsScope, settings_key::SettingsKey,
    store::SettingsStore, SettingsResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[cfg(test)]
#[path = "resetter_tests.rs"]
mod tests;

/// Deletes scope-level settings overrides.
#[derive(Clone)]
pub struct SettingsResetter {
    store: Arc<dyn SettingsStore>,
}

impl SettingsResetter {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Removes the override for `key` at the most specific scope of `context`.
    ///
    /// Only that scope is touched: resetting a branch leaves the school
    /// override in place.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Storage` if the store cannot be reached. A
    /// missing override is not an error.
    #[instrument(skip_all, fields(key = %key, tenant = ?context.tenant()))]
    pub async fn reset(&self, key: &SettingsKey, context: &SettingsContext) -> SettingsResult<()> {
        let scope = context.target_scope();
        self.remove(&scope, key).await
    }

    /// Removes the tenant-wide default for `key`.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn reset_tenant_default(&self, key: &SettingsKey) -> SettingsResult<()> {
        self.remove(&SettingsScope::Tenant, key).await
    }

    async fn remove(&self, scope: &SettingsScope, key: &SettingsKey) -> SettingsResult<()> {
        if self.store.delete(scope, key).await? {
            info!(message = "Settings override removed", key = %key, scope = %scope);
        } else {
            debug!(message = "No settings override to remove", key = %key, scope = %scope);
        }
        Ok(())
    }
}
