//! Infrastructure adapters for TestOps: file-backed key/value storage,
//! platform paths and configuration loading.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ConfigError, ConfigService};
pub use crate::paths::{PathError, TestOpsPaths};
pub use crate::storage::{AtomicFile, JsonFileStore, MemoryStore, StorageError};
