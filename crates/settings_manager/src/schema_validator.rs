//! JSON Schema-based settings validation.
//!
//! Holds one compiled JSON Schema per settings key. Schemas are either
//! supplied as raw JSON (for example loaded from files by an administrator)
//! or derived from a typed [`SettingsCategory`] through `schemars`.
//!
//! Keys without a registered schema are accepted as long as they pass the
//! structural check performed by [`ValidatedSettings`](crate::ValidatedSettings).
//!
//! # Examples
//!
//! ```rust
//! use settings_manager::{SchemaRegistryValidator, SettingsKey, ValidatedSettings};
//! use serde_json::json;
//!
//! let validator = SchemaRegistryValidator::with_builtin_categories()?;
//! let key = SettingsKey::try_new("email.smtp")?;
//!
//! assert!(ValidatedSettings::validate(key.clone(), json!({"port": 587}), &validator).is_ok());
//! assert!(ValidatedSettings::validate(key, json!({"port": "587"}), &validator).is_err());
//! # Ok::<(), settings_manager::SettingsError>(())
//! ```

use crate::{
    categories::{
        BrandingSettings, EmailSettings, FeeSettings, LocalizationSettings, SettingsCategory,
        SmtpSettings,
    },
    settings_key::SettingsKey,
    validator::{SettingsValidator, ValidationError, ValidationErrorType, ValidationResult},
    SettingsError, SettingsResult,
};
use schemars::schema_for;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

#[cfg(test)]
#[path = "schema_validator_tests.rs"]
mod tests;

/// Validator that checks each settings key against its registered JSON Schema.
#[derive(Default)]
pub struct SchemaRegistryValidator {
    schemas: HashMap<SettingsKey, jsonschema::Validator>,
}

impl SchemaRegistryValidator {
    /// Creates a registry with no schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the schemas of every built-in category.
    pub fn with_builtin_categories() -> SettingsResult<Self> {
        let mut registry = Self::new();
        registry.register_category::<EmailSettings>()?;
        registry.register_category::<SmtpSettings>()?;
        registry.register_category::<LocalizationSettings>()?;
        registry.register_category::<BrandingSettings>()?;
        registry.register_category::<FeeSettings>()?;
        Ok(registry)
    }

    /// Compiles and registers a schema for `key`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidSchema` if the schema does not compile.
    pub fn register_schema(&mut self, key: SettingsKey, schema: &Value) -> SettingsResult<()> {
        let compiled =
            jsonschema::validator_for(schema).map_err(|e| SettingsError::InvalidSchema {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        debug!(message = "Registered settings schema", key = %key);
        self.schemas.insert(key, compiled);
        Ok(())
    }

    /// Registers the schema generated from a typed category.
    pub fn register_category<C: SettingsCategory>(&mut self) -> SettingsResult<()> {
        let key = SettingsKey::try_new(C::KEY)?;
        let schema = serde_json::to_value(schema_for!(C)).map_err(|e| {
            SettingsError::InvalidSchema {
                key: C::KEY.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.register_schema(key, &schema)
    }

    pub fn has_schema(&self, key: &SettingsKey) -> bool {
        self.schemas.contains_key(key)
    }

    /// Keys with a registered schema, sorted.
    pub fn keys(&self) -> Vec<&SettingsKey> {
        let mut keys: Vec<&SettingsKey> = self.schemas.keys().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for SchemaRegistryValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistryValidator")
            .field("keys", &self.keys())
            .finish()
    }
}

impl SettingsValidator for SchemaRegistryValidator {
    fn validate(&self, key: &SettingsKey, value: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();

        let Some(schema) = self.schemas.get(key) else {
            return result;
        };

        for error in schema.iter_errors(value) {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::SchemaViolation,
                field_path: error.instance_path().to_string(),
                message: format!("{error}"),
            });
        }

        result
    }
}
