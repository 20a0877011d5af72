//! Hierarchical settings resolution for multi-tenant school management.
//!
//! Settings are schema-free JSON documents stored per settings key at three
//! tiers: tenant-wide defaults, school overrides and branch overrides. Reads
//! deep-merge the tiers in that fixed order of precedence; writes and resets
//! only ever touch the single scope the caller names.
//!
//! The main entry point is [`SchoolSettingsManager`]. Persistence is
//! abstracted behind [`SettingsStore`], with in-memory and file-backed
//! implementations provided.

// Domain types
pub mod context;
pub mod document;
pub mod errors;
pub mod scope;
pub mod settings_key;

// Persistence
pub mod file_store;
pub mod memory_store;
pub mod store;

// Resolution
pub mod merger;
pub mod resolved;
pub mod resolver;

// Validation and typed categories
pub mod categories;
pub mod schema_validator;
pub mod validator;

// Writes
pub mod manager;
pub mod resetter;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use categories::{
    BrandingSettings, EmailSettings, FeeSettings, LateFeePolicy, LocalizationSettings,
    SettingsCategory, SmtpEncryption, SmtpSettings,
};
pub use context::SettingsContext;
pub use document::{SettingsDocument, SettingsMap};
pub use errors::{SettingsError, SettingsResult};
pub use file_store::FileSettingsStore;
pub use manager::SchoolSettingsManager;
pub use memory_store::InMemorySettingsStore;
pub use merger::SettingsMerger;
pub use resetter::SettingsResetter;
pub use resolved::{ResolvedSettings, SettingsSourceTrace};
pub use resolver::SettingsResolver;
pub use schema_validator::SchemaRegistryValidator;
pub use scope::{ScopeId, ScopeLevel, SettingsScope};
pub use settings_key::SettingsKey;
pub use store::SettingsStore;
pub use validator::{
    SettingsValidator, StructuralValidator, ValidatedSettings, ValidationError,
    ValidationErrorType, ValidationResult,
};
pub use writer::SettingsWriter;
