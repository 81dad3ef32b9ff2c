//! Key/value storage adapter used to persist sessions between launches.
use std::collections::HashMap;
use std::sync::Mutex;

use crate::result::Result;

/// String key/value store with the shape of a platform storage API.
pub trait SessionStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Delete `key`; deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock()?.remove(key);
        Ok(())
    }
}
