//! Command modules for the school settings CLI.
//!
//! - `config_cmd`: Manage the CLI configuration file
//! - `settings_cmd`: Read, write and reset settings at each tier

pub mod config_cmd;
pub mod settings_cmd;
