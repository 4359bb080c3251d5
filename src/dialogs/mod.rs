//! Dialog reducers.
//!
//! Each dialog kind keeps its session state in a plain struct whose
//! `update` maps a [`Message`] to a list of [`Command`]s without touching
//! any collaborator.  [`crate::state::Dialog`] runs the reducer and executes
//! the commands.  The `open_*` helpers below wire construction-time
//! collaborators (store, suppression gate, classifier) into a mounted dialog.

pub mod confirm;
pub mod message;
pub mod picker;
pub mod schedule;
pub mod text_input;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::callbacks::DialogCallbacks;
use crate::env::DialogEnv;
use crate::filters::{CustomFilter, FilterStore};
use crate::messages::{Command, Message};
use crate::scheduling::FrequencyClassifier;
use crate::state::Dialog;
use crate::suppression::SuppressionGate;

pub use confirm::{ConfirmDialogState, ConfirmProps};
pub use message::MessageDialogState;
pub use picker::{PickerDialogState, PickerKind, PickerProps};
pub use schedule::{ScheduleDialogState, ScheduleProps};
pub use text_input::{TextInputDialogState, TextInputProps, Validator};

/// Dialog families.  The name doubles as the storage-key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogKind {
    Confirm,
    Message,
    TextInput,
    Schedule,
    SelectFile,
    SelectObject,
}

impl DialogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogKind::Confirm => "ConfirmDialog",
            DialogKind::Message => "MessageDialog",
            DialogKind::TextInput => "TextInputDialog",
            DialogKind::Schedule => "ScheduleDialog",
            DialogKind::SelectFile => "SelectFileDialog",
            DialogKind::SelectObject => "SelectObjectDialog",
        }
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-session state of one dialog.
pub trait DialogState: 'static {
    fn kind(&self) -> DialogKind;

    /// Pure transition: mutate session state, describe side effects.
    fn update(&mut self, msg: &Message) -> Vec<Command>;
}

pub fn open_confirm(
    props: ConfirmProps,
    env: DialogEnv,
    callbacks: impl DialogCallbacks + 'static,
) -> Dialog<ConfirmDialogState> {
    let gate = SuppressionGate::new(env.store.as_ref(), env.clock.as_ref());
    let (state, initial) = ConfirmDialogState::new(props, &gate, &env.settings);
    Dialog::mount(state, initial, env, callbacks)
}

pub fn open_message(env: DialogEnv, callbacks: impl DialogCallbacks + 'static) -> Dialog<MessageDialogState> {
    Dialog::mount(MessageDialogState::default(), Vec::new(), env, callbacks)
}

pub fn open_text_input(
    props: TextInputProps,
    validator: Option<Validator>,
    env: DialogEnv,
    callbacks: impl DialogCallbacks + 'static,
) -> Dialog<TextInputDialogState> {
    Dialog::mount(TextInputDialogState::new(props, validator), Vec::new(), env, callbacks)
}

pub fn open_schedule(
    props: ScheduleProps,
    env: DialogEnv,
    callbacks: impl DialogCallbacks + 'static,
) -> Dialog<ScheduleDialogState> {
    let state = ScheduleDialogState::new(props, &FrequencyClassifier);
    Dialog::mount(state, Vec::new(), env, callbacks)
}

pub fn open_picker(
    kind: PickerKind,
    props: PickerProps,
    custom_filter: Option<CustomFilter>,
    env: DialogEnv,
    callbacks: impl DialogCallbacks + 'static,
) -> Dialog<PickerDialogState> {
    let filters = FilterStore::new(env.store.as_ref(), kind.dialog_kind());
    let state = PickerDialogState::new(kind, props, &filters, custom_filter, &env.settings);
    Dialog::mount(state, Vec::new(), env, callbacks)
}
