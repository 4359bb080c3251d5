//! Plain message box: any button closes it.

use super::{DialogKind, DialogState};
use crate::messages::{Command, Message};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDialogState;

impl DialogState for MessageDialogState {
    fn kind(&self) -> DialogKind {
        DialogKind::Message
    }

    fn update(&mut self, msg: &Message) -> Vec<Command> {
        match msg {
            Message::Ok | Message::Cancel => vec![Command::Close],
            _ => Vec::new(),
        }
    }
}
