//! Yes/no confirmation with an optional "don't ask again for N minutes".

use serde::Deserialize;

use super::{DialogKind, DialogState};
use crate::config::DialogSettings;
use crate::messages::{Command, Message, OkValue};
use crate::suppression::SuppressionGate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfirmProps {
    /// Key for the suppression record; without it the dialog always asks.
    pub dialog_name: Option<String>,
    /// Offer the suppression checkbox for this many minutes.
    pub suppress_question_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialogState {
    dialog_name: Option<String>,
    suppress_minutes: Option<u32>,
    suppress_checked: bool,
    /// Auto-confirming: the dialog must not show itself.
    suppressed: bool,
}

impl ConfirmDialogState {
    /// A suppressed dialog returns a deferred `Ok` so the confirm happens
    /// after mount, never inside construction.
    pub fn new(props: ConfirmProps, gate: &SuppressionGate<'_>, settings: &DialogSettings) -> (Self, Vec<Command>) {
        let suppressed = props
            .dialog_name
            .as_deref()
            .map(|name| gate.is_suppressed(name))
            .unwrap_or(false);

        let state = Self {
            dialog_name: props.dialog_name,
            suppress_minutes: props.suppress_question_minutes.filter(|m| *m > 0),
            suppress_checked: false,
            suppressed,
        };

        let initial = if suppressed {
            crate::debug_log!("confirm {:?} suppressed, auto-confirming", state.dialog_name);
            vec![Command::SendMessageLater {
                delay_ms: settings.auto_confirm_delay_ms,
                message: Message::Ok,
            }]
        } else {
            Vec::new()
        };
        (state, initial)
    }

    pub fn is_visible(&self) -> bool {
        !self.suppressed
    }

    /// Whether the "don't ask again" checkbox is offered.
    pub fn offers_suppression(&self) -> bool {
        self.dialog_name.is_some() && self.suppress_minutes.is_some()
    }

    pub fn suppress_checked(&self) -> bool {
        self.suppress_checked
    }
}

impl DialogState for ConfirmDialogState {
    fn kind(&self) -> DialogKind {
        DialogKind::Confirm
    }

    fn update(&mut self, msg: &Message) -> Vec<Command> {
        match msg {
            Message::ToggleSuppress(checked) => {
                if self.offers_suppression() {
                    self.suppress_checked = *checked;
                }
                Vec::new()
            }
            Message::Ok => {
                let mut commands = Vec::new();
                if self.suppress_checked {
                    if let (Some(name), Some(minutes)) = (&self.dialog_name, self.suppress_minutes) {
                        commands.push(Command::Suppress {
                            dialog_name: name.clone(),
                            minutes,
                        });
                    }
                }
                commands.extend(Command::confirm(OkValue::Confirmed, None));
                commands
            }
            Message::Cancel => vec![Command::Close],
            _ => Vec::new(),
        }
    }
}
