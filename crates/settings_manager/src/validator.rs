//! Settings validation boundary.
//!
//! Each settings category owns its field-level rules. The write path only
//! accepts a [`ValidatedSettings`], which can be obtained solely by running a
//! [`SettingsValidator`] over the raw value. The core never inspects the
//! fields of a document itself.
//!
//! # Examples
//!
//! ```rust
//! use settings_manager::{SettingsKey, StructuralValidator, ValidatedSettings};
//! use serde_json::json;
//!
//! let key = SettingsKey::try_new("email").unwrap();
//! let validated = ValidatedSettings::validate(
//!     key.clone(),
//!     json!({"from_name": "School A"}),
//!     &StructuralValidator,
//! )?;
//! assert_eq!(validated.key(), &key);
//!
//! // Scalars and arrays are not settings documents.
//! assert!(ValidatedSettings::validate(key, json!([1, 2]), &StructuralValidator).is_err());
//! # Ok::<(), settings_manager::SettingsError>(())
//! ```

use crate::{document::SettingsMap, settings_key::SettingsKey, SettingsError, SettingsResult};
use serde_json::Value;
use tracing::debug;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Result of validating one settings value.
///
/// Validation is considered successful only if no errors are present.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty validation result.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add a validation error.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add multiple errors at once.
    pub fn add_errors(&mut self, errors: Vec<ValidationError>) {
        self.errors.extend(errors);
    }

    /// Folds another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.add_errors(other.errors);
    }
}

/// Individual validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The category of validation error.
    pub error_type: ValidationErrorType,
    /// JSON pointer to the offending field; empty for the document root.
    pub field_path: String,
    /// Human-readable error message.
    pub message: String,
}

/// Validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorType {
    /// The value is not a settings mapping.
    InvalidType,
    /// The value does not match the JSON schema registered for its key.
    SchemaViolation,
    /// A required field is missing.
    RequiredFieldMissing,
    /// A category-specific rule was violated.
    BusinessRuleViolation,
}

impl std::fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidType => write!(f, "InvalidType"),
            Self::SchemaViolation => write!(f, "SchemaViolation"),
            Self::RequiredFieldMissing => write!(f, "RequiredFieldMissing"),
            Self::BusinessRuleViolation => write!(f, "BusinessRuleViolation"),
        }
    }
}

/// Settings validation service.
///
/// Implementations collect every problem in a single pass rather than
/// stopping at the first one.
pub trait SettingsValidator: Send + Sync {
    /// Validates a raw value for the given settings key.
    fn validate(&self, key: &SettingsKey, value: &Value) -> ValidationResult;
}

/// Checks only that the value is a settings mapping.
///
/// This is the rule every document must satisfy regardless of its category.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl SettingsValidator for StructuralValidator {
    fn validate(&self, _key: &SettingsKey, value: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !value.is_object() {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::InvalidType,
                field_path: String::new(),
                message: format!(
                    "Settings must be a mapping of field names to values, found {}",
                    json_type_name(value)
                ),
            });
        }
        result
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

/// A settings value that passed validation for its key.
///
/// Fields are private: the only constructor runs a validator, so holding a
/// `ValidatedSettings` proves the value was checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    key: SettingsKey,
    value: SettingsMap,
}

impl ValidatedSettings {
    /// Validates `value` for `key`.
    ///
    /// The structural check always runs in addition to `validator`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::ValidationFailed` carrying every error found.
    pub fn validate(
        key: SettingsKey,
        value: Value,
        validator: &dyn SettingsValidator,
    ) -> SettingsResult<Self> {
        let mut result = StructuralValidator.validate(&key, &value);
        if result.is_valid() {
            result.merge(validator.validate(&key, &value));
        }

        if !result.is_valid() {
            debug!(
                message = "Settings rejected by validation",
                key = %key,
                error_count = result.errors.len()
            );
            return Err(SettingsError::ValidationFailed {
                key: key.into_string(),
                error_count: result.errors.len(),
                errors: result.errors,
            });
        }

        match value {
            Value::Object(map) => Ok(Self { key, value: map }),
            other => Err(SettingsError::ValidationFailed {
                key: key.into_string(),
                error_count: 1,
                errors: vec![ValidationError {
                    error_type: ValidationErrorType::InvalidType,
                    field_path: String::new(),
                    message: format!("Expected a mapping, found {}", json_type_name(&other)),
                }],
            }),
        }
    }

    pub fn key(&self) -> &SettingsKey {
        &self.key
    }

    pub fn value(&self) -> &SettingsMap {
        &self.value
    }

    pub fn into_parts(self) -> (SettingsKey, SettingsMap) {
        (self.key, self.value)
    }
}
