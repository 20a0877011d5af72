//! Settings key validation.
//!
//! Provides a branded type for the dotted namespace that identifies a
//! settings category (for example `email.smtp` or `school.custom_field`).

use crate::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Maximum length of a settings key, separators included.
pub const MAX_KEY_LENGTH: usize = 100;

/// A validated settings key.
///
/// Settings keys must:
/// - Be 1-100 characters long
/// - Consist of one or more segments separated by `.`
/// - Use only lowercase letters, digits, hyphens and underscores in each segment
/// - Not contain empty segments (no leading, trailing or doubled dots)
///
/// # Examples
///
/// ```
/// use settings_manager::SettingsKey;
///
/// let email = SettingsKey::try_new("email").unwrap();
/// let smtp = SettingsKey::try_new("email.smtp").unwrap();
/// assert_eq!(smtp.segments().collect::<Vec<_>>(), vec!["email", "smtp"]);
///
/// assert!(SettingsKey::try_new("").is_err());
/// assert!(SettingsKey::try_new("Email").is_err());
/// assert!(SettingsKey::try_new("email.").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingsKey(String);

impl SettingsKey {
    /// Create a new SettingsKey from a string.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidKey` if:
    /// - Key is empty or longer than 100 characters
    /// - Key has an empty segment
    /// - A segment contains characters other than lowercase letters, digits, hyphens, underscores
    pub fn try_new(key: impl Into<String>) -> SettingsResult<Self> {
        let key = key.into();

        if key.is_empty() {
            return Err(invalid(&key, "Settings key cannot be empty"));
        }

        if key.len() > MAX_KEY_LENGTH {
            let reason = format!(
                "Settings key too long ({} characters, maximum {})",
                key.len(),
                MAX_KEY_LENGTH
            );
            return Err(invalid(&key, &reason));
        }

        for segment in key.split('.') {
            if segment.is_empty() {
                return Err(invalid(&key, "Settings key contains an empty segment"));
            }

            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
            {
                let reason = format!(
                    "Segment '{}' contains invalid characters (only lowercase letters, digits, hyphens, and underscores allowed)",
                    segment
                );
                return Err(invalid(&key, &reason));
            }
        }

        Ok(Self(key))
    }

    /// Get the underlying string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dot-separated segments of the key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl TryFrom<String> for SettingsKey {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<&str> for SettingsKey {
    type Error = SettingsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl std::str::FromStr for SettingsKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SettingsKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for SettingsKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for SettingsKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<SettingsKey> for String {
    fn from(key: SettingsKey) -> String {
        key.0
    }
}

#[cfg(test)]
#[path = "settings_key_tests.rs"]
mod tests;
