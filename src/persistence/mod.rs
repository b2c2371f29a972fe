//! Key/value persistence
//!
//! The engine only ever stores small JSON strings under fixed keys. Reads and
//! writes are best-effort: a missing or broken store degrades to defaults and
//! a failed write is logged and dropped.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Minimal string store (LocalStorage on the web)
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    /// Returns false when the write did not land
    fn set_item(&mut self, key: &str, value: &str) -> bool;
    fn remove_item(&mut self, key: &str);
}

/// Read and decode `key`, `None` when absent or unparsable
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let json = storage.get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable '{key}': {e}");
            None
        }
    }
}

/// Encode and write `value` under `key`
pub fn save_json<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> bool {
    let Ok(json) = serde_json::to_string(value) else {
        return false;
    };
    let saved = storage.set_item(key, &json);
    if !saved {
        log::warn!("Could not persist '{key}'");
    }
    saved
}

/// In-process store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    /// Simulates a full or disabled store
    pub read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses every write
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.items.insert(key.to_string(), value.to_string());
        true
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser LocalStorage (silently absent in private mode or sandboxed frames)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok()?
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.inner
            .as_ref()
            .map(|s| s.set_item(key, value).is_ok())
            .unwrap_or(false)
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(storage) = &self.inner {
            let _ = storage.remove_item(key);
        }
    }
}
