//! Outgoing mail settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sender identity and transport selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmailSettings {
    /// Transport name, e.g. `smtp` or `log`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    /// Display name used in the `From` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,

    /// Address used in the `From` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,

    /// Address replies are directed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// SMTP transport encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    None,
    Tls,
    Ssl,
}

/// SMTP server connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SmtpSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<SmtpEncryption>,
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
