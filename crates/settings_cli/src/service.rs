//! Builds the settings service described by the CLI configuration.

use std::{fs, path::Path, sync::Arc};

use serde_json::Value;
use settings_manager::{
    FileSettingsStore, SchemaRegistryValidator, SchoolSettingsManager, SettingsKey,
};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Creates a manager backed by the file store under `storage.data_dir`,
/// enforcing the schemas selected in `[validation]`.
pub fn build_manager(config: &AppConfig) -> Result<SchoolSettingsManager, Error> {
    let store = FileSettingsStore::new(config.storage.data_dir.clone());
    let validator = build_validator(config)?;

    info!(
        message = "Settings service ready",
        data_dir = ?config.storage.data_dir,
        schemas = validator.keys().len(),
        tenant = config.tenant.name.as_deref().unwrap_or("default")
    );

    Ok(SchoolSettingsManager::with_validator(
        Arc::new(store),
        Arc::new(validator),
    ))
}

/// Creates the schema validator for the configured built-in categories and
/// schema directory.
pub fn build_validator(config: &AppConfig) -> Result<SchemaRegistryValidator, Error> {
    let mut validator = if config.validation.builtin_categories {
        SchemaRegistryValidator::with_builtin_categories()?
    } else {
        SchemaRegistryValidator::new()
    };

    if let Some(schema_dir) = &config.validation.schema_dir {
        load_schema_dir(&mut validator, schema_dir)?;
    }

    Ok(validator)
}

/// Registers every `<key>.json` file in `dir`. A file schema replaces a
/// built-in schema with the same key.
fn load_schema_dir(validator: &mut SchemaRegistryValidator, dir: &Path) -> Result<(), Error> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::Config(format!("Failed to read schema directory {:?}: {}", dir, e))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::Config(format!("Failed to read schema directory {:?}: {}", dir, e))
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let key = SettingsKey::try_new(stem).map_err(|e| {
            Error::Config(format!("Schema file {:?} is not named after a settings key: {}", path, e))
        })?;

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read schema file {:?}: {}", path, e)))?;
        let schema: Value = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse schema file {:?}: {}", path, e)))?;

        validator.register_schema(key, &schema)?;
        debug!(message = "Registered schema file", path = ?path);
    }

    Ok(())
}
