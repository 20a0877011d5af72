//! Settings write coordination.
//!
//! Persists validated settings at exactly one scope. A school-level save only
//! ever writes the school (or branch) document; tenant defaults change only
//! through the explicit administrative [`SettingsWriter::save_tenant_default`].

use crate::{
    context::SettingsContext,
    document::SettingsDocument,
    scope::SettingsScope,
    store::SettingsStore,
    validator::ValidatedSettings,
    SettingsResult,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;

/// Writes validated settings to the store.
#[derive(Clone)]
pub struct SettingsWriter {
    store: Arc<dyn SettingsStore>,
}

impl SettingsWriter {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Saves `settings` at the most specific scope of `context`.
    ///
    /// Writes to the branch when the context has one, otherwise to the school.
    /// The stored document is replaced as a whole.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Storage` if the document cannot be persisted.
    #[instrument(skip_all, fields(key = %settings.key(), tenant = ?context.tenant()))]
    pub async fn save(
        &self,
        context: &SettingsContext,
        settings: ValidatedSettings,
    ) -> SettingsResult<SettingsDocument> {
        let scope = context.target_scope();
        self.write(&scope, settings).await
    }

    /// Replaces the tenant-wide default document for a key.
    ///
    /// This is an administrative operation and is never performed implicitly.
    #[instrument(skip_all, fields(key = %settings.key()))]
    pub async fn save_tenant_default(
        &self,
        settings: ValidatedSettings,
    ) -> SettingsResult<SettingsDocument> {
        self.write(&SettingsScope::Tenant, settings).await
    }

    async fn write(
        &self,
        scope: &SettingsScope,
        settings: ValidatedSettings,
    ) -> SettingsResult<SettingsDocument> {
        let (key, value) = settings.into_parts();
        let field_count = value.len();
        let document = self.store.put(scope, &key, value).await?;

        info!(
            message = "Settings saved",
            key = %key,
            scope = %scope,
            field_count = field_count
        );
        Ok(document)
    }
}
