//! Settings scopes.
//!
//! A settings document lives at exactly one tier of the override hierarchy:
//! the tenant-wide default, a school, or a branch of a school. The tiers are
//! ordered by precedence (lowest to highest): Tenant < School < Branch.

use crate::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;

/// Maximum length of a school or branch identifier.
pub const MAX_SCOPE_ID_LENGTH: usize = 64;

/// Identifier of a school or branch.
///
/// Identifiers are also used as directory names by the file-backed store, so
/// they are restricted to ASCII letters, digits, hyphens and underscores.
///
/// # Examples
///
/// ```
/// use settings_manager::ScopeId;
///
/// let school = ScopeId::try_new("north-campus").unwrap();
/// let numeric = ScopeId::from(42u64);
/// assert_eq!(numeric.as_str(), "42");
///
/// assert!(ScopeId::try_new("").is_err());
/// assert!(ScopeId::try_new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScopeId(String);

impl ScopeId {
    /// Create a new ScopeId from a string.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidScope` if the identifier is empty, too
    /// long, or contains characters outside `[A-Za-z0-9_-]`.
    pub fn try_new(id: impl Into<String>) -> SettingsResult<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(SettingsError::InvalidScope {
                reason: "Scope identifier cannot be empty".to_string(),
            });
        }

        if id.len() > MAX_SCOPE_ID_LENGTH {
            return Err(SettingsError::InvalidScope {
                reason: format!(
                    "Scope identifier too long ({} characters, maximum {})",
                    id.len(),
                    MAX_SCOPE_ID_LENGTH
                ),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SettingsError::InvalidScope {
                reason: format!("Scope identifier '{}' contains invalid characters", id),
            });
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ScopeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl TryFrom<String> for ScopeId {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl std::str::FromStr for ScopeId {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl From<ScopeId> for String {
    fn from(id: ScopeId) -> String {
        id.0
    }
}

impl AsRef<str> for ScopeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Precedence tier of a settings document.
///
/// The derived ordering is the merge order: a higher level overrides a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Tenant-wide defaults (lowest precedence).
    Tenant,
    /// School-specific overrides.
    School,
    /// Branch-specific overrides (highest precedence).
    Branch,
}

impl ScopeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeLevel::Tenant => "tenant",
            ScopeLevel::School => "school",
            ScopeLevel::Branch => "branch",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScopeLevel {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tenant" => Ok(ScopeLevel::Tenant),
            "school" => Ok(ScopeLevel::School),
            "branch" => Ok(ScopeLevel::Branch),
            other => Err(SettingsError::InvalidScope {
                reason: format!(
                    "Unknown scope level '{}' (expected tenant, school or branch)",
                    other
                ),
            }),
        }
    }
}

/// The owner of a settings document: a tier plus, below the tenant, an identifier.
///
/// The tenant scope carries no identifier; a store instance serves exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "level", content = "id", rename_all = "snake_case")]
pub enum SettingsScope {
    Tenant,
    School(ScopeId),
    Branch(ScopeId),
}

impl SettingsScope {
    /// Builds a scope from a level and an optional identifier.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidScope` when a school or branch scope is
    /// requested without an identifier, or a tenant scope with one.
    pub fn from_parts(level: ScopeLevel, id: Option<ScopeId>) -> SettingsResult<Self> {
        match (level, id) {
            (ScopeLevel::Tenant, None) => Ok(SettingsScope::Tenant),
            (ScopeLevel::Tenant, Some(id)) => Err(SettingsError::InvalidScope {
                reason: format!("Tenant scope does not take an identifier (got '{}')", id),
            }),
            (ScopeLevel::School, Some(id)) => Ok(SettingsScope::School(id)),
            (ScopeLevel::Branch, Some(id)) => Ok(SettingsScope::Branch(id)),
            (level, None) => Err(SettingsError::InvalidScope {
                reason: format!("The {} scope requires an identifier", level),
            }),
        }
    }

    /// Returns the precedence tier of this scope.
    pub fn level(&self) -> ScopeLevel {
        match self {
            SettingsScope::Tenant => ScopeLevel::Tenant,
            SettingsScope::School(_) => ScopeLevel::School,
            SettingsScope::Branch(_) => ScopeLevel::Branch,
        }
    }

    /// Returns the school or branch identifier, if any.
    pub fn id(&self) -> Option<&ScopeId> {
        match self {
            SettingsScope::Tenant => None,
            SettingsScope::School(id) | SettingsScope::Branch(id) => Some(id),
        }
    }
}

impl fmt::Display for SettingsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}:{}", self.level(), id),
            None => write!(f, "{}", self.level()),
        }
    }
}
