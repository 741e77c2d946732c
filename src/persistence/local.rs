//! Browser LocalStorage backend

use super::{KeyValueStore, Result, StorageError};

/// `window.localStorage`, scoped to the page origin
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Grab the page's LocalStorage handle
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", err))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // Throws QuotaExceededError when full
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}
