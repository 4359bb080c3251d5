//! Schedule (cron / wizard) editor dialog.

use serde::Deserialize;

use super::{DialogKind, DialogState};
use crate::messages::{Command, Message, OkValue};
use crate::schedule::{normalize, resolve_mode, EditorMode, ModeFlags, ScheduleClassifier, ScheduleValue};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleProps {
    /// Raw schedule as stored by the host; any of the accepted shapes.
    pub cron: Option<String>,
    #[serde(flatten)]
    pub flags: ModeFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDialogState {
    flags: ModeFlags,
    mode: EditorMode,
    value: ScheduleValue,
}

impl ScheduleDialogState {
    pub fn new(props: ScheduleProps, classifier: &dyn ScheduleClassifier) -> Self {
        let value = normalize(props.cron.as_deref());
        let mode = resolve_mode(&props.flags, &value, classifier);
        crate::debug_log!("schedule dialog opened in {} mode with {}", mode, value);
        Self {
            flags: props.flags,
            mode,
            value,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn value(&self) -> &ScheduleValue {
        &self.value
    }

    pub fn flags(&self) -> ModeFlags {
        self.flags
    }
}

impl DialogState for ScheduleDialogState {
    fn kind(&self) -> DialogKind {
        DialogKind::Schedule
    }

    fn update(&mut self, msg: &Message) -> Vec<Command> {
        match msg {
            Message::SwitchMode(mode) => {
                if self.flags.allows_switch_to(*mode) {
                    self.mode = *mode;
                } else {
                    log::warn!("switch to {} mode not allowed with {:?}", mode, self.flags);
                }
                Vec::new()
            }
            Message::ScheduleEdited(raw) => {
                self.value = normalize(Some(raw));
                Vec::new()
            }
            Message::FrequencyPicked(frequency) => {
                self.value = ScheduleValue::Cron(frequency.to_cron());
                Vec::new()
            }
            Message::Ok => Command::confirm(OkValue::Single(self.value.as_str().to_string()), None),
            Message::Clear => Command::confirm(OkValue::Cleared, None),
            Message::Cancel => vec![Command::Close],
            _ => Vec::new(),
        }
    }
}
