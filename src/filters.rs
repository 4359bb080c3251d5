//! Picker filter criteria and their per-dialog persistence.
//!
//! The browsing widget owns the actual filtering; the dialog only remembers
//! the last criteria per named instance so reopening the same picker comes
//! back with the same view.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dialogs::DialogKind;
use crate::storage::{storage_key, KeyValueStore};

/// Well-known filter field names.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const ROOM: &str = "room";
    pub const FUNCTION: &str = "func";
    pub const ROLE: &str = "role";
    pub const TYPE: &str = "type";
    pub const CUSTOM: &str = "custom";
}

/// Field name → filter value.  Missing keys mean "no filter on that field".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterRecord(BTreeMap<String, String>);

impl FilterRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        self.0.insert(field.to_string(), value.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Shallow override: keys in `overrides` win, everything else keeps the stored
/// value.
pub fn merge(stored: &FilterRecord, overrides: &FilterRecord) -> FilterRecord {
    let mut merged = stored.clone();
    for (field, value) in overrides.iter() {
        merged.insert(field, value);
    }
    merged
}

/// Load / save of filter records for one dialog kind.
pub struct FilterStore<'a> {
    store: &'a dyn KeyValueStore,
    kind: DialogKind,
}

impl<'a> FilterStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore, kind: DialogKind) -> Self {
        Self { store, kind }
    }

    /// Stored record for `dialog_name`; missing or malformed data reads as an
    /// empty record.
    pub fn load(&self, dialog_name: &str) -> FilterRecord {
        let key = storage_key(self.kind, dialog_name);
        let Some(raw) = self.store.get(&key) else {
            crate::debug_log!("no stored filters under {}", key);
            return FilterRecord::new();
        };
        match serde_json::from_str::<FilterRecord>(&raw) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("ignoring malformed filters under {}: {}", key, e);
                FilterRecord::new()
            }
        }
    }

    /// Overwrite the stored record.  Backend failures are logged; a lost
    /// filter preference is not worth interrupting the user for.
    pub fn save(&self, dialog_name: &str, record: &FilterRecord) {
        let key = storage_key(self.kind, dialog_name);
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                log::error!("failed to serialize filters for {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(&key, &json) {
            log::warn!("failed to persist filters under {}: {}", key, e);
        }
    }

    pub fn merge(stored: &FilterRecord, overrides: &FilterRecord) -> FilterRecord {
        merge(stored, overrides)
    }
}

/// Predicate over a browsed object (JSON form).
pub type ObjectPredicate = Rc<dyn Fn(&serde_json::Value) -> bool>;

/// Caller-supplied extra filter for the object picker.
#[derive(Clone)]
pub enum CustomFilter {
    /// The supported capability: a real predicate.
    Predicate(ObjectPredicate),
    /// Legacy: JavaScript function-body source taking `obj`.  Only honoured
    /// when explicitly enabled in [`crate::config::DialogSettings`].
    LegacySource(String),
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomFilter::Predicate(_) => f.write_str("CustomFilter::Predicate(..)"),
            CustomFilter::LegacySource(src) => f.debug_tuple("CustomFilter::LegacySource").field(src).finish(),
        }
    }
}

impl CustomFilter {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> bool + 'static,
    {
        CustomFilter::Predicate(Rc::new(f))
    }

    /// Turn the filter into a usable predicate.  `None` means "no filtering"
    /// (every object passes); legacy source that is disabled or broken ends up
    /// there too.
    pub fn compile(self, allow_legacy_source: bool) -> Option<ObjectPredicate> {
        match self {
            CustomFilter::Predicate(p) => Some(p),
            CustomFilter::LegacySource(src) if !allow_legacy_source => {
                log::warn!("legacy filter source ignored (disabled): {}", src);
                None
            }
            CustomFilter::LegacySource(src) => compile_legacy_source(&src),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn compile_legacy_source(src: &str) -> Option<ObjectPredicate> {
    use wasm_bindgen::{JsCast, JsValue};

    let wrapped = format!("(function (obj) {{ {} }})", src);
    let func = match js_sys::eval(&wrapped) {
        Ok(value) => match value.dyn_into::<js_sys::Function>() {
            Ok(func) => func,
            Err(_) => {
                log::error!("legacy filter did not evaluate to a function: {}", src);
                return None;
            }
        },
        Err(e) => {
            log::error!("legacy filter failed to compile: {:?}", e);
            return None;
        }
    };

    Some(Rc::new(move |obj: &serde_json::Value| {
        let arg = match serde_wasm_bindgen::to_value(obj) {
            Ok(arg) => arg,
            Err(e) => {
                log::warn!("could not pass object to legacy filter: {}", e);
                return true;
            }
        };
        match func.call1(&JsValue::NULL, &arg) {
            Ok(result) => result.is_truthy(),
            Err(e) => {
                log::warn!("legacy filter threw: {:?}", e);
                true
            }
        }
    }))
}

#[cfg(not(target_arch = "wasm32"))]
fn compile_legacy_source(src: &str) -> Option<ObjectPredicate> {
    log::warn!("legacy filter source needs a browser runtime, ignoring: {}", src);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_missing_and_malformed() {
        let store = MemoryStore::new();
        let filters = FilterStore::new(&store, DialogKind::SelectObject);
        assert!(filters.load("main").is_empty());

        store.set("SelectObjectDialog.main", "{not json").unwrap();
        assert!(filters.load("main").is_empty());

        store.set("SelectObjectDialog.main", "{\"id\": 5}").unwrap();
        assert!(filters.load("main").is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let filters = FilterStore::new(&store, DialogKind::SelectObject);
        let record = FilterRecord::new()
            .with(fields::ROOM, "kitchen")
            .with(fields::TYPE, "state");

        filters.save("main", &record);
        assert_eq!(filters.load("main"), record);

        // other dialog names / kinds are separate
        assert!(filters.load("other").is_empty());
        assert!(FilterStore::new(&store, DialogKind::SelectFile).load("main").is_empty());
    }

    #[test]
    fn test_save_overwrites_whole_record() {
        let store = MemoryStore::new();
        let filters = FilterStore::new(&store, DialogKind::SelectObject);
        filters.save("main", &FilterRecord::new().with(fields::ROOM, "kitchen"));
        filters.save("main", &FilterRecord::new().with(fields::ROLE, "switch"));

        let loaded = filters.load("main");
        assert_eq!(loaded.get(fields::ROLE), Some("switch"));
        assert_eq!(loaded.get(fields::ROOM), None);
    }

    #[test]
    fn test_merge_is_shallow_override() {
        let stored = FilterRecord::new()
            .with(fields::ROOM, "kitchen")
            .with(fields::NAME, "lamp");
        let overrides = FilterRecord::new().with(fields::ROOM, "hall");

        let merged = FilterStore::merge(&stored, &overrides);
        assert_eq!(merged.get(fields::ROOM), Some("hall"));
        assert_eq!(merged.get(fields::NAME), Some("lamp"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_custom_filter_compile() {
        let only_states = CustomFilter::predicate(|obj| obj["type"] == "state");
        let pred = only_states.compile(false).expect("predicate");
        assert!(pred(&serde_json::json!({ "type": "state" })));
        assert!(!pred(&serde_json::json!({ "type": "channel" })));

        let legacy = CustomFilter::LegacySource("return true;".into());
        assert!(legacy.compile(false).is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_legacy_source_is_inert_natively() {
        let legacy = CustomFilter::LegacySource("return obj.type === 'state';".into());
        assert!(legacy.compile(true).is_none());
    }
}
