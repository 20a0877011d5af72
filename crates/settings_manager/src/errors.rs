//! Settings service error types.
//!
//! Domain-specific errors for loading, validating, merging and persisting
//! settings documents.
//!
//! A key that was never written at any tier is not an error: resolution
//! yields an empty mapping instead.

use thiserror::Error;

use crate::validator::ValidationError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Settings service errors.
///
/// Storage failures are surfaced immediately and never retried by the
/// service. Validation failures indicate a programming error at the call
/// site: the caller handed over data that does not satisfy the rules for its
/// settings category.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Settings storage failed during {operation}: {reason}")]
    Storage { operation: String, reason: String },

    #[error("Settings validation failed for '{key}' with {error_count} error(s)")]
    ValidationFailed {
        key: String,
        error_count: usize,
        errors: Vec<ValidationError>,
    },

    #[error("Invalid settings key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Invalid settings scope: {reason}")]
    InvalidScope { reason: String },

    #[error("Invalid JSON schema for '{key}': {reason}")]
    InvalidSchema { key: String, reason: String },

    #[error("Failed to decode settings '{key}': {reason}")]
    Decode { key: String, reason: String },
}

impl SettingsError {
    /// Builds a storage error for the named operation.
    pub fn storage(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Storage {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error came from the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
