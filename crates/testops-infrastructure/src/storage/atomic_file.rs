//! Atomic text file operations.
//!
//! Provides a thin layer for safe concurrent access to the store's value files.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use testops_core::TestOpsError;
use thiserror::Error;

/// Errors that can occur during atomic file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File I/O error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File locking error.
    #[error("Lock error on {path}: {message}")]
    Lock { path: PathBuf, message: String },
    /// Key cannot be mapped to a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<StorageError> for TestOpsError {
    fn from(err: StorageError) -> Self {
        TestOpsError::storage(err.to_string())
    }
}

/// A handle to a text file that is replaced atomically.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: A lock file serialises writers
/// - **Durability**: Explicit fsync before rename
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    /// Creates a new handle. Nothing is touched on disk.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the managed file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: File exists and has non-blank content
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read the file
    pub fn load(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    /// Replaces the file content atomically while holding the lock.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully saved
    /// - `Err`: Failed to lock, write or rename
    pub fn save(&self, content: &str) -> Result<(), StorageError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_replace(content)
    }

    fn write_replace(&self, content: &str) -> Result<(), StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
        tmp_file
            .write_all(content.as_bytes())
            .map_err(|e| StorageError::io(&tmp_path, e))?;

        // Ensure data is written to disk
        tmp_file
            .sync_all()
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    /// Temporary sibling used for the atomic write.
    fn temp_path(&self) -> Result<PathBuf, StorageError> {
        let parent = self.path.parent().ok_or_else(|| {
            StorageError::io(
                &self.path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Path has no parent directory",
                ),
            )
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            StorageError::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no file name"),
            )
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The `.lock` file is left in place. Removing it on release would let a
/// later writer lock a fresh inode while an earlier waiter still holds the
/// old one.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock next to `path`.
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StorageError::io(&lock_path, e))?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| StorageError::Lock {
                path: lock_path.clone(),
                message: format!("Failed to acquire lock: {}", e),
            })?;
        }

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("value.json"));

        file.save(r#"{"count":42}"#).unwrap();

        assert_eq!(file.load().unwrap().as_deref(), Some(r#"{"count":42}"#));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("missing.json"));

        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_blank_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();

        assert!(AtomicFile::new(path).load().unwrap().is_none());
    }

    #[test]
    fn test_atomic_write_leaves_no_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("value.json");
        let file = AtomicFile::new(file_path.clone());

        file.save("first").unwrap();
        file.save("second").unwrap();

        assert!(file_path.exists());
        assert!(!file_path.with_file_name(".value.json.tmp").exists());
        assert_eq!(file.load().unwrap().as_deref(), Some("second"));
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_file_outlives_guard() {
        use fs2::FileExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("value.json");
        let lock_path = path.with_extension("lock");

        let guard = FileLock::acquire(&path).unwrap();
        let other = File::open(&lock_path).unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(guard);

        // Same inode, now free
        assert!(lock_path.exists());
        other.try_lock_exclusive().unwrap();
        other.unlock().unwrap();

        AtomicFile::new(path).save("after").unwrap();
        assert!(lock_path.exists());
    }
}
