//! Settings resolution.
//!
//! Loads the tenant, school and branch documents for a key and merges them
//! into the effective value. Results are recomputed on every call, so a save
//! or reset is visible to the very next resolution.

use crate::{
    categories::SettingsCategory,
    context::SettingsContext,
    merger::SettingsMerger,
    resolved::ResolvedSettings,
    scope::{ScopeId, SettingsScope},
    settings_key::SettingsKey,
    store::SettingsStore,
    SettingsResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Computes effective settings from the store.
///
/// Resolution never fails because a document is missing; an entirely unset
/// key yields an empty mapping. Storage failures are returned immediately
/// without falling back to partial results.
#[derive(Clone)]
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
    merger: SettingsMerger,
}

impl SettingsResolver {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            merger: SettingsMerger::new(),
        }
    }

    /// Resolves a key for the school (and branch, if any) in `context`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Storage` if any tier cannot be loaded.
    #[instrument(skip_all, fields(key = %key, school = %context.school(), branch = ?context.branch(), tenant = ?context.tenant()))]
    pub async fn resolve(
        &self,
        key: &SettingsKey,
        context: &SettingsContext,
    ) -> SettingsResult<ResolvedSettings> {
        self.resolve_for(key, Some(context.school()), context.branch())
            .await
    }

    /// Resolves a key for an optional school and branch.
    ///
    /// With neither given this returns the tenant defaults. A branch without a
    /// school is layered directly above the tenant tier.
    #[instrument(skip_all, fields(key = %key, school = ?school, branch = ?branch))]
    pub async fn resolve_for(
        &self,
        key: &SettingsKey,
        school: Option<&ScopeId>,
        branch: Option<&ScopeId>,
    ) -> SettingsResult<ResolvedSettings> {
        let mut scopes = vec![SettingsScope::Tenant];
        if let Some(school) = school {
            scopes.push(SettingsScope::School(school.clone()));
        }
        if let Some(branch) = branch {
            scopes.push(SettingsScope::Branch(branch.clone()));
        }

        let mut layers = Vec::with_capacity(scopes.len());
        for scope in scopes {
            if let Some(document) = self.store.get(&scope, key).await? {
                layers.push((scope.level(), document.value));
            }
        }

        debug!(
            message = "Loaded settings tiers",
            key = %key,
            tiers_found = layers.len()
        );

        Ok(self.merger.merge_layers(key.clone(), layers))
    }

    /// Resolves and decodes a typed settings category.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Decode` if the merged document does not fit the category.
    pub async fn resolve_category<C: SettingsCategory>(
        &self,
        context: &SettingsContext,
    ) -> SettingsResult<C> {
        let key = SettingsKey::try_new(C::KEY)?;
        self.resolve(&key, context).await?.decode()
    }
}
