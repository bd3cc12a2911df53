//! Key-value persistence
//!
//! The game only ever stores small strings (the high score, the settings
//! blob), so every backend speaks the same `get_item`/`set_item` pair the
//! browser's LocalStorage does. Failures are logged and swallowed: losing a
//! save must never stop play.

use std::collections::BTreeMap;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// String key-value store
pub trait KeyValueStore {
    /// Read a value; `None` if absent or the store is unavailable
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value; returns false if it could not be stored
    fn set_item(&mut self, key: &str, value: &str) -> bool;
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        (**self).set_item(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("k"), None);
        assert!(store.set_item("k", "v1"));
        assert!(store.set_item("k", "v2"));
        assert_eq!(store.get_item("k").as_deref(), Some("v2"));
    }
}
