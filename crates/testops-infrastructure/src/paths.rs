//! Unified path management for TestOps files.
//!
//! All platform directories are resolved here via the `dirs` crate so the
//! CLI and the stores agree on locations (Linux, macOS, Windows).

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "testops";

/// Errors that can occur during path resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find the platform config directory")]
    ConfigDirNotFound,
    /// Platform data directory could not be determined.
    #[error("Cannot find the platform data directory")]
    DataDirNotFound,
}

/// Unified path management for TestOps.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/testops/           # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.local/share/testops/      # Data directory (JsonFileStore root)
/// ├── testops-chat-history.json
/// └── testops-theme.json
/// ```
pub struct TestOpsPaths;

impl TestOpsPaths {
    /// Returns the TestOps configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/testops/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the TestOps data directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to data directory (e.g., `~/.local/share/testops/`)
    /// - `Err(PathError::DataDirNotFound)`: Could not determine directory
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
