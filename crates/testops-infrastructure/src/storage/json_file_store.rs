//! File-backed key/value store.

use std::fs;
use std::path::{Path, PathBuf};
use testops_core::{KeyValueStore, Result};

use super::atomic_file::{AtomicFile, StorageError};

/// Stores each key as `<data_dir>/<key>.json`.
///
/// Writes go through [`AtomicFile`], so a crash mid-save leaves the previous
/// value intact. Values are stored verbatim; the file store does not parse
/// them.
///
/// # Directory Structure
///
/// ```text
/// ~/.local/share/testops/
/// ├── testops-chat-history.json   # Session snapshot
/// ├── testops-theme.json          # Theme preference
/// └── testops-active-session.json # Last CLI selection
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> std::result::Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StorageError::Io {
            path: data_dir.clone(),
            source,
        })?;
        tracing::debug!("[JsonFileStore] Using data dir {}", data_dir.display());
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing `key`.
    ///
    /// Keys are restricted to ASCII alphanumerics, `-`, `_` and `.` so they
    /// cannot escape the data directory.
    pub fn path_for(&self, key: &str) -> std::result::Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }

    fn file(&self, key: &str) -> std::result::Result<AtomicFile, StorageError> {
        self.path_for(key).map(AtomicFile::new)
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let value = self.file(key)?.load()?;
        if value.is_none() {
            tracing::debug!("[JsonFileStore] No value for {}", key);
        }
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.file(key)?.save(value).inspect_err(|err| {
            tracing::warn!("[JsonFileStore] Failed to save {}: {}", key, err);
        })?;
        tracing::debug!("[JsonFileStore] Saved {} ({} bytes)", key, value.len());
        Ok(())
    }
}
