//! JSON file backend for native builds

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::{KeyValueStore, Result};

/// All keys kept in one JSON object on disk.
///
/// The whole file is rewritten on every mutation, written to a sibling temp
/// file first and renamed over the original.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store; a corrupt
    /// one is logged and treated as empty (it is replaced on the next write).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = if path.exists() {
            let json = fs::read_to_string(&path)?;
            match serde_json::from_str(&json) {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        log::info!("Opened {} ({} keys)", path.display(), items.len());

        Ok(Self {
            path,
            items: RefCell::new(items),
        })
    }

    // Memory must not run ahead of the file after a failed flush
    fn restore(&self, key: &str, previous: Option<String>) {
        let mut items = self.items.borrow_mut();
        match previous {
            Some(value) => items.insert(key.to_string(), value),
            None => items.remove(key),
        };
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.items.borrow())?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let previous = self
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush().inspect_err(|_| self.restore(key, previous))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let previous = self.items.borrow_mut().remove(key);
        if previous.is_some() {
            self.flush().inspect_err(|_| self.restore(key, previous))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStorage::open(&path).unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "[1,2]").unwrap();
        store.set_item("gone", "x").unwrap();
        store.remove_item("gone").unwrap();
        drop(store);

        let store = FileStorage::open(&path).unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.get_item("gone").unwrap(), None);
    }

    #[test]
    fn test_failed_flush_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("nested");
        let store = FileStorage::open(blocker.join("store.json")).unwrap();

        // A plain file where the parent directory should go
        fs::write(&blocker, "").unwrap();
        assert!(store.set_item("k", "v").is_err());
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "definitely not json").unwrap();

        let store = FileStorage::open(&path).unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);

        store.set_item("k", "v").unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
