//! Configuration management for the school settings CLI.
//!
//! The CLI reads a TOML file that tells it where settings documents live on
//! disk and which JSON schemas to enforce on writes. The file is looked up in
//! this order:
//!
//! 1. The `--config` argument
//! 2. The `SCHOOL_SETTINGS_CONFIG` environment variable
//! 3. `settings.toml` in the current directory

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "settings.toml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV_VAR: &str = "SCHOOL_SETTINGS_CONFIG";

/// Default directory for stored settings documents.
pub const DEFAULT_DATA_DIR: &str = "settings-data";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the school settings CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/school-settings"
///
/// [validation]
/// builtin_categories = true
/// schema_dir = "/etc/school-settings/schemas"
///
/// [tenant]
/// name = "greenfield-academy"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where settings documents are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Which schemas are enforced when settings are written
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Tenant labelling
    #[serde(default)]
    pub tenant: TenantConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, or
    /// does not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration at `path`, falling back to defaults when no
    /// file exists there.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(
                message = "No configuration file found, using defaults",
                path = ?path
            );
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the specified path.
    ///
    /// Parent directories are created when missing and an existing file is
    /// overwritten.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
            }
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the file-backed settings store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Register schemas for the built-in settings categories.
    #[serde(default = "default_true")]
    pub builtin_categories: bool,

    /// Directory of `<key>.json` schema files, e.g. `transport.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_dir: Option<PathBuf>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            builtin_categories: true,
            schema_dir: None,
        }
    }
}

/// Tenant configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Display label attached to log events and resolution contexts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_true() -> bool {
    true
}

/// Works out which configuration file to use.
///
/// An explicit path wins, then the `SCHOOL_SETTINGS_CONFIG` environment
/// variable, then `settings.toml` in the current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    current_dir.join(DEFAULT_CONFIG_FILENAME)
}
