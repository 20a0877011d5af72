use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;
use crate::service::build_validator;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check configuration syntax and schema files
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show current configuration
    Show {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Execute the config command and return the text to print.
///
/// `default_path` is the global `--config` value, used when the subcommand
/// has no `--path` of its own.
#[instrument(skip_all)]
pub fn execute(cmd: ConfigCommands, default_path: Option<&str>) -> Result<String, Error> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref().or(default_path)),
        ConfigCommands::Validate { path } => validate_config(path.as_deref().or(default_path)),
        ConfigCommands::Show { path } => show_config(path.as_deref().or(default_path)),
    }
}

/// Initialize a new configuration file
fn init_config(path: Option<&str>) -> Result<String, Error> {
    let config_path = get_config_path(path);
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = %err
        );
        return Err(err);
    }

    AppConfig::default().save(&config_path)?;

    info!(message = "Configuration initialized", path = ?config_path);
    Ok(format!("Configuration initialized at {:?}", config_path))
}

/// Validate a configuration file, including any schema files it points to
fn validate_config(path: Option<&str>) -> Result<String, Error> {
    let config_path = get_config_path(path);
    debug!(message = "Validating configuration", path = ?config_path);

    let config = AppConfig::load(&config_path)?;
    let validator = build_validator(&config).inspect_err(|e| {
        error!(
            message = "Configuration is invalid",
            path = ?config_path,
            error = %e
        );
    })?;

    info!(message = "Configuration is valid", path = ?config_path);
    Ok(format!(
        "Configuration is valid ({} schema(s) registered)",
        validator.keys().len()
    ))
}

/// Show the configuration in effect
fn show_config(path: Option<&str>) -> Result<String, Error> {
    let config_path = get_config_path(path);
    debug!(message = "Showing configuration", path = ?config_path);

    let config = AppConfig::load_or_default(&config_path)?;
    toml::to_string_pretty(&config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
}
