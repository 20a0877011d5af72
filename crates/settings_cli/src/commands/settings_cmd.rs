//! Settings commands for the school settings CLI.
//!
//! These commands resolve, write and reset settings documents across the
//! tenant, school and branch tiers.
//!
//! # Examples
//!
//! ```bash
//! # Effective email settings for branch 9 of school 5, with the tier of each value
//! school-settings get email --school 5 --branch 9 --trace
//!
//! # Override the sender name for school 5
//! school-settings set email '{"from_name": "Greenfield Academy"}' --school 5
//!
//! # Tenant-wide default
//! school-settings set-default localization '{"timezone": "Africa/Nairobi"}'
//!
//! # Drop the branch override so the school value shows through again
//! school-settings reset email --school 5 --branch 9
//! ```

use clap::{Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use serde_json::Value;
use settings_manager::{
    ResolvedSettings, SchoolSettingsManager, ScopeId, ScopeLevel, SettingsContext, SettingsKey,
    SettingsScope,
};
use tracing::{debug, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "settings_cmd_tests.rs"]
mod tests;

/// Output format for resolved settings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Compact single-line JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
}

/// Settings subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommands {
    /// Show the effective settings for a school or branch
    Get {
        /// Settings key, e.g. "email" or "email.smtp"
        key: String,

        /// School to resolve for
        #[arg(long)]
        school: String,

        /// Branch of the school (optional)
        #[arg(long)]
        branch: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Show which tier supplied each value
        #[arg(long)]
        trace: bool,
    },

    /// Save an override for a school or branch
    Set {
        /// Settings key
        key: String,

        /// Settings document as a JSON object
        value: String,

        /// School to save for
        #[arg(long)]
        school: String,

        /// Save for this branch instead of the whole school
        #[arg(long)]
        branch: Option<String>,
    },

    /// Replace the tenant-wide default for a key
    SetDefault {
        /// Settings key
        key: String,

        /// Settings document as a JSON object
        value: String,
    },

    /// Remove the override for a school or branch
    Reset {
        /// Settings key
        key: String,

        /// School to reset
        #[arg(long)]
        school: String,

        /// Reset this branch instead of the whole school
        #[arg(long)]
        branch: Option<String>,
    },

    /// Remove the tenant-wide default for a key
    ResetDefault {
        /// Settings key
        key: String,
    },

    /// List the keys stored at one tier
    List {
        /// Tier to list (tenant, school or branch)
        #[arg(long)]
        scope: String,

        /// School or branch id; required unless the tier is tenant
        #[arg(long)]
        id: Option<String>,
    },
}

/// Executes a settings command and returns the text to print.
#[instrument(skip_all)]
pub async fn execute(
    cmd: SettingsCommands,
    manager: &SchoolSettingsManager,
    tenant: Option<&str>,
) -> Result<String, Error> {
    match cmd {
        SettingsCommands::Get {
            key,
            school,
            branch,
            format,
            trace,
        } => {
            let key = SettingsKey::try_new(key)?;
            let context = build_context(&school, branch.as_deref(), tenant)?;
            let resolved = manager.resolve(&key, &context).await?;
            debug!(
                message = "Resolved settings",
                key = %key,
                scope = %context.target_scope(),
                fields = resolved.source_trace.len()
            );
            format_resolved(&resolved, format, trace)
        }
        SettingsCommands::Set {
            key,
            value,
            school,
            branch,
        } => {
            let key = SettingsKey::try_new(key)?;
            let context = build_context(&school, branch.as_deref(), tenant)?;
            let document = manager.save(&key, parse_value(&value)?, &context).await?;
            Ok(format!("Saved '{}' at {}", document.key, document.scope))
        }
        SettingsCommands::SetDefault { key, value } => {
            let key = SettingsKey::try_new(key)?;
            let document = manager.save_tenant_default(&key, parse_value(&value)?).await?;
            Ok(format!("Saved '{}' at {}", document.key, document.scope))
        }
        SettingsCommands::Reset {
            key,
            school,
            branch,
        } => {
            let key = SettingsKey::try_new(key)?;
            let context = build_context(&school, branch.as_deref(), tenant)?;
            manager.reset(&key, &context).await?;
            Ok(format!("Reset '{}' at {}", key, context.target_scope()))
        }
        SettingsCommands::ResetDefault { key } => {
            let key = SettingsKey::try_new(key)?;
            manager.reset_tenant_default(&key).await?;
            Ok(format!("Reset '{}' at {}", key, SettingsScope::Tenant))
        }
        SettingsCommands::List { scope, id } => {
            let scope = parse_scope(&scope, id.as_deref())?;
            let keys = manager.list_overrides(&scope).await?;
            if keys.is_empty() {
                return Ok(format!("No settings stored at {}", scope));
            }
            Ok(keys
                .iter()
                .map(|key| key.as_str())
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

/// Builds the resolution context for a school and optional branch.
pub fn build_context(
    school: &str,
    branch: Option<&str>,
    tenant: Option<&str>,
) -> Result<SettingsContext, Error> {
    let mut context = SettingsContext::new(ScopeId::try_new(school)?);
    if let Some(branch) = branch {
        context = context.with_branch(ScopeId::try_new(branch)?);
    }
    if let Some(tenant) = tenant {
        context = context.with_tenant(tenant);
    }
    Ok(context)
}

/// Parses a `--scope`/`--id` pair.
pub fn parse_scope(level: &str, id: Option<&str>) -> Result<SettingsScope, Error> {
    let level: ScopeLevel = level.parse()?;
    let id = id.map(ScopeId::try_new).transpose()?;
    Ok(SettingsScope::from_parts(level, id)?)
}

/// Parses a settings value given on the command line.
pub fn parse_value(raw: &str) -> Result<Value, Error> {
    serde_json::from_str(raw).map_err(|e| Error::InvalidJson(e.to_string()))
}

/// Renders resolved settings, optionally followed by the tier of each leaf.
pub fn format_resolved(
    resolved: &ResolvedSettings,
    format: OutputFormat,
    trace: bool,
) -> Result<String, Error> {
    let values = Value::Object(resolved.values.clone());
    let mut output = match format {
        OutputFormat::Json => serde_json::to_string(&values),
        OutputFormat::Pretty => serde_json::to_string_pretty(&values),
    }
    .map_err(|e| Error::Output(e.to_string()))?;

    if trace {
        output.push_str(&format!("\n\n{}\n", "Sources:".bold()));
        for (path, level) in resolved.source_trace.entries() {
            let value = resolved
                .get(path)
                .map(Value::to_string)
                .unwrap_or_default();
            output.push_str(&format!(
                "  {} = {}  [{}]\n",
                path,
                value,
                tier_label(level)
            ));
        }
    }

    Ok(output)
}

fn tier_label(level: ScopeLevel) -> ColoredString {
    match level {
        ScopeLevel::Tenant => level.as_str().blue(),
        ScopeLevel::School => level.as_str().green(),
        ScopeLevel::Branch => level.as_str().yellow(),
    }
}
