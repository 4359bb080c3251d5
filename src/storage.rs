//! Persistent key/value access for dialog state that outlives a session.
//!
//! Filter records and suppression timestamps share one namespace keyed by
//! `"<DialogKind>.<dialogName>"`.  Dialog code never reaches into
//! `localStorage` directly; it gets a [`KeyValueStore`] injected through
//! [`crate::env::DialogEnv`].

use std::cell::RefCell;
use std::collections::HashMap;

use crate::constants::STORAGE_KEY_SEPARATOR;
use crate::dialogs::DialogKind;
use crate::error::DialogError;

/// Build the shared storage key for a dialog instance.
pub fn storage_key(kind: DialogKind, dialog_name: &str) -> String {
    format!("{}{}{}", kind.as_str(), STORAGE_KEY_SEPARATOR, dialog_name)
}

/// Minimal synchronous string store.  Reads never fail (a broken backend
/// reads as "missing"); writes report backend errors to the caller.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), DialogError>;
    fn remove(&self, key: &str) -> Result<(), DialogError>;
}

/// In-memory store.  Used natively and in tests; last writer wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DialogError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DialogError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage` backed store.
pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    /// Grab the page's local storage.  Fails when there is no window (worker,
    /// native build) or the browser blocks storage access.
    pub fn local() -> Result<Self, DialogError> {
        let window = web_sys::window().ok_or(DialogError::MissingCollaborator("window"))?;
        let storage = window
            .local_storage()
            .map_err(|e| DialogError::Storage(format!("{:?}", e)))?
            .ok_or(DialogError::MissingCollaborator("local storage"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("localStorage read of '{}' failed: {:?}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DialogError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| DialogError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), DialogError> {
        self.storage
            .remove_item(key)
            .map_err(|e| DialogError::Storage(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_format() {
        assert_eq!(storage_key(DialogKind::SelectObject, "main"), "SelectObjectDialog.main");
        assert_eq!(storage_key(DialogKind::Confirm, "delete.all"), "ConfirmDialog.delete.all");
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").is_none());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        assert!(!store.contains("a"));
        assert!(store.is_empty());
    }
}
