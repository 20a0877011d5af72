//! Settings resolution context.
//!
//! This module provides the `SettingsContext` type which carries the school,
//! optional branch, and optional tenant label of the request that is reading
//! or writing settings. It is passed explicitly to every operation instead of
//! being looked up from ambient request state.
//!
//! # Examples
//!
//! ```
//! use settings_manager::{ScopeId, SettingsContext};
//!
//! let context = SettingsContext::new(ScopeId::from(12u64))
//!     .with_branch(ScopeId::from(3u64))
//!     .with_tenant("greenfield-academy");
//! ```

use crate::scope::{ScopeId, SettingsScope};
use chrono::{DateTime, Utc};

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// Settings resolution context.
///
/// # Examples
///
/// ```
/// use settings_manager::{ScopeId, SettingsContext, SettingsScope};
///
/// let school = ScopeId::from(12u64);
/// let context = SettingsContext::new(school.clone());
/// assert_eq!(context.school(), &school);
/// assert_eq!(context.branch(), None);
/// assert_eq!(context.target_scope(), SettingsScope::School(school.clone()));
///
/// let branch = ScopeId::from(3u64);
/// let context = context.with_branch(branch.clone());
/// assert_eq!(context.target_scope(), SettingsScope::Branch(branch));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsContext {
    /// The school the request operates on.
    school: ScopeId,

    /// Optional branch of the school.
    branch: Option<ScopeId>,

    /// Optional tenant label, used for log fields only.
    tenant: Option<String>,

    /// Timestamp when this context was created.
    created_at: DateTime<Utc>,
}

impl SettingsContext {
    /// Creates a new context for a school.
    pub fn new(school: ScopeId) -> Self {
        Self {
            school,
            branch: None,
            tenant: None,
            created_at: Utc::now(),
        }
    }

    /// Narrows the context to a branch of the school.
    pub fn with_branch(mut self, branch: ScopeId) -> Self {
        self.branch = Some(branch);
        self
    }

    /// Attaches a tenant label used in log output.
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn school(&self) -> &ScopeId {
        &self.school
    }

    pub fn branch(&self) -> Option<&ScopeId> {
        self.branch.as_ref()
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the most specific scope identified by this context.
    ///
    /// Writes and resets target this scope; the tenant tier is never implied.
    pub fn target_scope(&self) -> SettingsScope {
        match &self.branch {
            Some(branch) => SettingsScope::Branch(branch.clone()),
            None => SettingsScope::School(self.school.clone()),
        }
    }

    /// Returns the scopes consulted during resolution, lowest precedence first.
    pub fn resolution_chain(&self) -> Vec<SettingsScope> {
        let mut chain = vec![
            SettingsScope::Tenant,
            SettingsScope::School(self.school.clone()),
        ];
        if let Some(branch) = &self.branch {
            chain.push(SettingsScope::Branch(branch.clone()));
        }
        chain
    }
}
