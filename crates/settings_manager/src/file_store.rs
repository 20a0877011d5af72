//! File-backed settings store.
//!
//! Persists each document as a JSON file below a root directory:
//!
//! ```text
//! <root>/
//! ├── tenant/
//! │   └── email.json
//! ├── schools/
//! │   └── 12/
//! │       └── email.json
//! └── branches/
//!     └── 3/
//!         └── email.smtp.json
//! ```
//!
//! Writes go to a temporary sibling file which is then renamed over the
//! target, so a concurrent reader sees either the old or the new document.

use crate::{
    document::{SettingsDocument, SettingsMap},
    scope::SettingsScope,
    settings_key::SettingsKey,
    store::SettingsStore,
    SettingsError, SettingsResult,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;

const DOCUMENT_EXTENSION: &str = "json";

/// Shared by every store in the process so two handles over one root never
/// pick the same temporary file.
static WRITE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Settings store backed by JSON files on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    root: PathBuf,
}

impl FileSettingsStore {
    /// Creates a store rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_dir(&self, scope: &SettingsScope) -> PathBuf {
        match scope {
            SettingsScope::Tenant => self.root.join("tenant"),
            SettingsScope::School(id) => self.root.join("schools").join(id.as_str()),
            SettingsScope::Branch(id) => self.root.join("branches").join(id.as_str()),
        }
    }

    fn document_path(&self, scope: &SettingsScope, key: &SettingsKey) -> PathBuf {
        self.scope_dir(scope)
            .join(format!("{}.{}", key.as_str(), DOCUMENT_EXTENSION))
    }

    fn temp_path(&self, target: &Path) -> PathBuf {
        let n = WRITE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = target.as_os_str().to_owned();
        name.push(format!(".tmp-{}-{}", std::process::id(), n));
        PathBuf::from(name)
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    #[instrument(skip_all, fields(scope = %scope, key = %key))]
    async fn get(
        &self,
        scope: &SettingsScope,
        key: &SettingsKey,
    ) -> SettingsResult<Option<SettingsDocument>> {
        let path = self.document_path(scope, key);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(message = "No settings document", path = ?path);
                return Ok(None);
            }
            Err(e) => {
                return Err(SettingsError::storage(
                    "get",
                    format!("failed to read {:?}: {}", path, e),
                ))
            }
        };

        let document: SettingsDocument = serde_json::from_slice(&content).map_err(|e| {
            SettingsError::storage("get", format!("corrupt document {:?}: {}", path, e))
        })?;

        Ok(Some(document))
    }

    #[instrument(skip_all, fields(scope = %scope, key = %key))]
    async fn put(
        &self,
        scope: &SettingsScope,
        key: &SettingsKey,
        value: SettingsMap,
    ) -> SettingsResult<SettingsDocument> {
        let path = self.document_path(scope, key);
        let document = SettingsDocument::new(scope.clone(), key.clone(), value);

        let content = serde_json::to_vec_pretty(&document)
            .map_err(|e| SettingsError::storage("put", format!("failed to encode: {}", e)))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SettingsError::storage("put", format!("failed to create {:?}: {}", parent, e))
            })?;
        }

        let temp = self.temp_path(&path);
        tokio::fs::write(&temp, content).await.map_err(|e| {
            SettingsError::storage("put", format!("failed to write {:?}: {}", temp, e))
        })?;

        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!(message = "Failed to remove temporary file", path = ?temp, error = %cleanup);
            }
            return Err(SettingsError::storage(
                "put",
                format!("failed to replace {:?}: {}", path, e),
            ));
        }

        info!(message = "Settings document written", path = ?path);
        Ok(document)
    }

    #[instrument(skip_all, fields(scope = %scope, key = %key))]
    async fn delete(&self, scope: &SettingsScope, key: &SettingsKey) -> SettingsResult<bool> {
        let path = self.document_path(scope, key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(message = "Settings document removed", path = ?path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SettingsError::storage(
                "delete",
                format!("failed to remove {:?}: {}", path, e),
            )),
        }
    }

    #[instrument(skip_all, fields(scope = %scope))]
    async fn list_keys(&self, scope: &SettingsScope) -> SettingsResult<Vec<SettingsKey>> {
        let dir = self.scope_dir(scope);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SettingsError::storage(
                    "list_keys",
                    format!("failed to read {:?}: {}", dir, e),
                ))
            }
        };

        let mut keys = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                SettingsError::storage("list_keys", format!("failed to read {:?}: {}", dir, e))
            })?;
            let Some(entry) = entry else {
                break;
            };

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match SettingsKey::try_new(stem) {
                Ok(key) => keys.push(key),
                Err(e) => warn!(message = "Skipping unrecognised settings file", path = ?path, error = %e),
            }
        }

        keys.sort();
        Ok(keys)
    }
}
