use settings_manager::SettingsError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the school settings CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing the CLI configuration.
    ///
    /// Returned when the configuration file cannot be read or parsed, or when
    /// a schema file it points to is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A settings value given on the command line is not valid JSON.
    #[error("Invalid JSON value: {0}")]
    InvalidJson(String),

    /// The settings service reported an error.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Failed to render command output.
    #[error("Failed to format output: {0}")]
    Output(String),
}
