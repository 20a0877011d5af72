use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use settings_cli::commands::{
    config_cmd::{self, ConfigCommands},
    settings_cmd::{self, SettingsCommands},
};
use settings_cli::config::{get_config_path, AppConfig};
use settings_cli::errors::Error;
use settings_cli::service::build_manager;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// School settings CLI: inspect and manage tenant, school and branch settings
#[derive(Parser, Debug)]
#[command(name = "school-settings")]
#[command(about = "Inspect and manage tenant, school and branch settings", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Settings(SettingsCommands),

    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

async fn run(cli: Cli) -> Result<String, Error> {
    match cli.command {
        Commands::Settings(cmd) => {
            let config = AppConfig::load_or_default(&get_config_path(cli.config.as_deref()))?;
            let manager = build_manager(&config)?;
            settings_cmd::execute(cmd, &manager, config.tenant.name.as_deref()).await
        }
        Commands::Config(cmd) => config_cmd::execute(cmd, cli.config.as_deref()),
        Commands::Version => Ok(format!(
            "school-settings version {}",
            option_env!("SCHOOL_SETTINGS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
        )),
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("SCHOOL_SETTINGS_LOG"))
        .init();

    let cli = Cli::parse();
    let code = report(run(cli).await);
    if code != 0 {
        std::process::exit(code);
    }
}

/// Prints command output, or logs the error, and returns the exit code.
fn report(result: Result<String, Error>) -> i32 {
    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Error: {e}");
            1
        }
    }
}
