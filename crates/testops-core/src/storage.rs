//! Persistent key/value store abstraction.
//!
//! The session manager and the theme preference persist through this trait
//! only. Implementations live in `testops-infrastructure`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Key holding the JSON array of all sessions.
pub const SESSIONS_KEY: &str = "testops-chat-history";

/// Key holding the `light`/`dark` theme preference.
pub const THEME_KEY: &str = "testops-theme";

/// Synchronous string-keyed durable storage.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Persist the full value on `save` or return an error (no partial writes)
/// - Return `Ok(None)` from `load` for keys that were never written
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// JSON helpers layered over [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Loads and deserializes the value under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Value present and well-formed
    /// - `Ok(None)`: Key never written
    /// - `Err(_)`: Read failed or the value does not match `T`
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.load(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and stores it under `key`.
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.save(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
