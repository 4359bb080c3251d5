//! Host-facing callbacks of a dialog.

use std::cell::RefCell;
use std::rc::Rc;

use crate::messages::OkValue;

/// What the host gets told.  `on_close` is invoked exactly once per dialog
/// lifecycle; `on_ok` at most once and always before `on_close`.
pub trait DialogCallbacks {
    fn on_ok(&mut self, value: OkValue, display_name: Option<String>);
    fn on_close(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Ok {
        value: OkValue,
        display_name: Option<String>,
    },
    Close,
}

/// Callbacks that just record what happened.  Clones share the same log, so
/// keep one clone and hand the other to the dialog.
#[derive(Debug, Clone, Default)]
pub struct RecordedCallbacks {
    events: Rc<RefCell<Vec<DialogEvent>>>,
}

impl RecordedCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DialogEvent> {
        self.events.borrow().clone()
    }

    pub fn ok_values(&self) -> Vec<OkValue> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                DialogEvent::Ok { value, .. } => Some(value.clone()),
                DialogEvent::Close => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, DialogEvent::Close))
            .count()
    }
}

impl DialogCallbacks for RecordedCallbacks {
    fn on_ok(&mut self, value: OkValue, display_name: Option<String>) {
        self.events
            .borrow_mut()
            .push(DialogEvent::Ok { value, display_name });
    }

    fn on_close(&mut self) {
        self.events.borrow_mut().push(DialogEvent::Close);
    }
}
