//! "Don't ask again" support for confirmation dialogs.
//!
//! The store holds one epoch-ms timestamp per confirm dialog name, meaning
//! "auto-confirm until then".  Expired records are removed on read.

use crate::clock::Clock;
use crate::constants::MS_PER_MINUTE;
use crate::dialogs::DialogKind;
use crate::error::DialogError;
use crate::storage::{storage_key, KeyValueStore};

pub struct SuppressionGate<'a> {
    store: &'a dyn KeyValueStore,
    clock: &'a dyn Clock,
}

impl<'a> SuppressionGate<'a> {
    pub fn new(store: &'a dyn KeyValueStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    fn key(dialog_name: &str) -> String {
        storage_key(DialogKind::Confirm, dialog_name)
    }

    /// Whether the dialog should auto-confirm instead of asking.
    pub fn is_suppressed(&self, dialog_name: &str) -> bool {
        let key = Self::key(dialog_name);
        let until = match self.store.get(&key) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(until) => until,
                Err(_) => {
                    log::warn!("ignoring unreadable suppression record {}={:?}", key, raw);
                    return false;
                }
            },
            None => return false,
        };
        if until <= 0 {
            return false;
        }
        if until < self.clock.now_ms() {
            crate::debug_log!("suppression of {} expired", key);
            if let Err(e) = self.store.remove(&key) {
                log::warn!("failed to drop expired suppression {}: {}", key, e);
            }
            return false;
        }
        true
    }

    /// Auto-confirm `dialog_name` for the next `minutes` minutes.
    pub fn suppress_for(&self, dialog_name: &str, minutes: u32) -> Result<(), DialogError> {
        let until = self.clock.now_ms() + i64::from(minutes) * MS_PER_MINUTE;
        self.store.set(&Self::key(dialog_name), &until.to_string())
    }
}
