//! JSON file backend for native builds

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// All keys in one JSON object on disk, rewritten on every set
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file starts empty; an unreadable one is logged and ignored.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, items }
    }

    fn flush(&self) -> bool {
        let json = match serde_json::to_string_pretty(&self.items) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode store: {}", e);
                return false;
            }
        };
        match fs::write(&self.path, json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not write {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
