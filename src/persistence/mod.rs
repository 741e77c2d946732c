//! Key-value persistence
//!
//! Features:
//! - `KeyValueStore` trait mirroring the browser Storage API
//! - LocalStorage backend (wasm32), in-memory and JSON-file backends
//! - `Slot` state for lazily loaded values
//! - JSON read/write helpers that degrade to `None` on corrupt data

mod memory;
pub use memory::MemoryStorage;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Synchronous string-keyed store, durable across reloads.
///
/// Methods take `&self`: the browser Storage object is a shared handle, and
/// every other backend uses interior mutability to match it.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Read and parse a JSON value stored under `key`.
///
/// Missing keys, backend failures and values that don't parse as `T` all
/// come back as `None`; the last two are logged.
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let json = match store.get_item(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed value under '{}': {}", key, e);
            None
        }
    }
}

/// Serialize `value` and store it under `key`. Returns whether the write landed.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| store.set_item(key, &json));

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to write '{}': {}", key, e);
            false
        }
    }
}

/// Remove `key`, logging failures.
pub fn remove(store: &(impl KeyValueStore + ?Sized), key: &str) {
    if let Err(e) = store.remove_item(key) {
        log::warn!("Failed to remove '{}': {}", key, e);
    }
}

/// A value that is read from storage on first access
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Slot<T> {
    #[default]
    Unloaded,
    Loaded(T),
}

impl<T> Slot<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Slot::Loaded(_))
    }

    /// Load with `load` if still unloaded, then borrow the value.
    pub fn get_or_load(&mut self, load: impl FnOnce() -> T) -> &T {
        if let Slot::Unloaded = self {
            *self = Slot::Loaded(load());
        }
        match self {
            Slot::Loaded(value) => value,
            Slot::Unloaded => unreachable!("slot was loaded above"),
        }
    }

    pub fn set(&mut self, value: T) {
        *self = Slot::Loaded(value);
    }

    pub fn reset(&mut self) {
        *self = Slot::Unloaded;
    }
}

/// Store that can be told to fail, for exercising the degraded paths
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;

    use super::{KeyValueStore, MemoryStorage, Result, StorageError};

    #[derive(Default)]
    pub(crate) struct FlakyStorage {
        pub inner: MemoryStorage,
        pub fail_reads: Cell<bool>,
        pub fail_writes: Cell<bool>,
    }

    impl FlakyStorage {
        pub fn new() -> Self {
            Self::default()
        }

        fn quota() -> StorageError {
            StorageError::Backend("QuotaExceededError".to_string())
        }
    }

    impl KeyValueStore for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads.get() {
                return Err(StorageError::Unavailable);
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.get() {
                return Err(Self::quota());
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            if self.fail_writes.get() {
                return Err(Self::quota());
            }
            self.inner.remove_item(key)
        }
    }
}
