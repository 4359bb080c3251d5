// src/messages.rs
//
// Events a dialog reacts to, and the side effects its reducer asks for.
//
use crate::dialogs::DialogKind;
use crate::filters::FilterRecord;
use crate::schedule::EditorMode;
use crate::scheduling::Frequency;
use crate::selection::IncomingSelection;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Shared buttons
    Ok,
    Cancel,
    Clear,

    // Confirm dialog
    ToggleSuppress(bool),

    // Text input dialog
    TextChanged(String),

    // Schedule dialog
    SwitchMode(EditorMode),
    ScheduleEdited(String),
    /// Simple editor pick; stored as its cron form.
    FrequencyPicked(Frequency),

    // Pickers: reported by the browsing widget
    SelectionChanged {
        selection: IncomingSelection,
        is_double_click: bool,
        is_folder: bool,
        display_name: Option<String>,
    },
    FiltersChanged(FilterRecord),
}

/// Value handed to the host's `onOk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OkValue {
    Single(String),
    Multiple(Vec<String>),
    /// Explicit clear; distinct from an empty selection (`false` in JS).
    Cleared,
    /// Positive answer of a confirm dialog (`true` in JS).
    Confirmed,
}

/// Commands represent side effects executed after the reducer ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Report the final value to the host.
    Ok {
        value: OkValue,
        display_name: Option<String>,
    },

    /// Close the dialog (host `onClose`).
    Close,

    /// Persist the filter record for a named picker.
    SaveFilters {
        kind: DialogKind,
        dialog_name: String,
        record: FilterRecord,
    },

    /// Start a "don't ask again" window for a confirm dialog.
    Suppress { dialog_name: String, minutes: u32 },

    /// Feed a message back into the same dialog after a delay.
    SendMessageLater { delay_ms: u32, message: Message },
}

impl Command {
    /// The usual confirm pair: emit the value, then close.
    pub fn confirm(value: OkValue, display_name: Option<String>) -> Vec<Command> {
        vec![Command::Ok { value, display_name }, Command::Close]
    }
}
