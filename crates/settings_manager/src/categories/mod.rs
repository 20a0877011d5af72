//! Typed settings categories.
//!
//! Documents are stored schema-free; a category gives one settings key a
//! concrete shape at the boundary. All fields are optional so that the
//! partial documents stored at school and branch level decode on their own,
//! and `None` is never serialized, so a typed save cannot write `null`.

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};

pub mod branding;
pub mod email;
pub mod fees;
pub mod localization;

pub use branding::BrandingSettings;
pub use email::{EmailSettings, SmtpEncryption, SmtpSettings};
pub use fees::{FeeSettings, LateFeePolicy};
pub use localization::LocalizationSettings;

/// A settings category with a fixed key and typed representation.
pub trait SettingsCategory: Serialize + DeserializeOwned + JsonSchema {
    /// The settings key under which documents of this category are stored.
    const KEY: &'static str;
}

impl SettingsCategory for EmailSettings {
    const KEY: &'static str = "email";
}

impl SettingsCategory for SmtpSettings {
    const KEY: &'static str = "email.smtp";
}

impl SettingsCategory for LocalizationSettings {
    const KEY: &'static str = "localization";
}

impl SettingsCategory for BrandingSettings {
    const KEY: &'static str = "branding";
}

impl SettingsCategory for FeeSettings {
    const KEY: &'static str = "finance.fees";
}
