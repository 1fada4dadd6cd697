//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the application
//! configuration from the configuration file (~/.config/testops/config.toml)
//! and applies environment overrides on top.

use crate::paths::{PathError, TestOpsPaths};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use testops_core::{AppConfig, TestOpsError};
use thiserror::Error;

/// Overrides `gateway.base_url`.
pub const ENV_API_BASE: &str = "TESTOPS_API_BASE";
/// Overrides `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "TESTOPS_DATA_DIR";
/// Overrides `logging.level`.
pub const ENV_LOG: &str = "TESTOPS_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
}

impl From<ConfigError> for TestOpsError {
    fn from(err: ConfigError) -> Self {
        TestOpsError::config(err.to_string())
    }
}

/// Configuration service that loads and caches the application configuration.
///
/// The file is read once; later calls return the cached value until
/// [`invalidate_cache`](Self::invalidate_cache) is called.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the platform config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn get_config(&self) -> Result<AppConfig, ConfigError> {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let path = self.config_path()?;
        let mut loaded = Self::load_file(&path)?;
        apply_env_overrides(&mut loaded, |name| std::env::var(name).ok());

        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    /// Directory for the key/value store: the configured one, or the platform
    /// data directory.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        let config = self.get_config()?;
        match config.storage.data_dir {
            Some(dir) => Ok(dir),
            None => Ok(TestOpsPaths::data_dir()?),
        }
    }

    fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(TestOpsPaths::config_file()?),
        }
    }

    /// Reads `path`; a missing or blank file yields the defaults.
    fn load_file(path: &Path) -> Result<AppConfig, ConfigError> {
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                path.display()
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("[ConfigService] Loaded config from {}", path.display());
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `TESTOPS_*` overrides read through `lookup`. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(base_url) = read(ENV_API_BASE) {
        config.gateway.base_url = base_url;
    }
    if let Some(data_dir) = read(ENV_DATA_DIR) {
        config.storage.data_dir = Some(PathBuf::from(data_dir));
    }
    if let Some(level) = read(ENV_LOG) {
        config.logging.level = level;
    }
}
