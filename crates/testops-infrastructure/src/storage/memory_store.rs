//! In-process key/value store.

use std::collections::HashMap;
use std::sync::RwLock;
use testops_core::{KeyValueStore, Result, TestOpsError};

/// Keeps values in a map for the lifetime of the process.
///
/// Used by tests and by runs that should leave nothing on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| TestOpsError::internal("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| TestOpsError::internal("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load("absent").unwrap(), None);
    }

    #[test]
    fn test_save_replaces_value() {
        let store = MemoryStore::with_entries([("k", "v1")]);
        store.save("k", "v2").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v2"));
    }
}
