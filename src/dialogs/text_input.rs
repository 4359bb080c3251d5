//! Single-line text prompt with optional validation.

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use super::{DialogKind, DialogState};
use crate::messages::{Command, Message, OkValue};

/// Returns an error text for invalid input, `None` when acceptable.
pub type Validator = Rc<dyn Fn(&str) -> Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextInputProps {
    pub text: String,
    pub allow_empty: bool,
}

#[derive(Clone)]
pub struct TextInputDialogState {
    text: String,
    allow_empty: bool,
    error: Option<String>,
    validator: Option<Validator>,
}

impl fmt::Debug for TextInputDialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInputDialogState")
            .field("text", &self.text)
            .field("allow_empty", &self.allow_empty)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl TextInputDialogState {
    pub fn new(props: TextInputProps, validator: Option<Validator>) -> Self {
        let error = validator.as_ref().and_then(|v| v(&props.text));
        Self {
            text: props.text,
            allow_empty: props.allow_empty,
            error,
            validator,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_confirm(&self) -> bool {
        self.error.is_none() && (self.allow_empty || !self.text.trim().is_empty())
    }
}

impl DialogState for TextInputDialogState {
    fn kind(&self) -> DialogKind {
        DialogKind::TextInput
    }

    fn update(&mut self, msg: &Message) -> Vec<Command> {
        match msg {
            Message::TextChanged(text) => {
                self.text = text.clone();
                self.error = self.validator.as_ref().and_then(|v| v(text));
                Vec::new()
            }
            Message::Ok if self.can_confirm() => Command::confirm(OkValue::Single(self.text.clone()), None),
            Message::Ok => {
                crate::debug_log!("text input Ok ignored: {:?}", self.error);
                Vec::new()
            }
            Message::Cancel => vec![Command::Close],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_spaces() -> Validator {
        Rc::new(|text: &str| text.contains(' ').then(|| "no spaces allowed".to_string()))
    }

    #[test]
    fn test_blank_text_blocks_ok() {
        let mut state = TextInputDialogState::new(TextInputProps::default(), None);
        assert!(!state.can_confirm());
        assert!(state.update(&Message::Ok).is_empty());

        state.update(&Message::TextChanged("name".into()));
        assert_eq!(
            state.update(&Message::Ok),
            Command::confirm(OkValue::Single("name".into()), None)
        );
    }

    #[test]
    fn test_allow_empty() {
        let props = TextInputProps {
            text: String::new(),
            allow_empty: true,
        };
        assert!(TextInputDialogState::new(props, None).can_confirm());
    }

    #[test]
    fn test_validator_errors_block_ok() {
        let mut state = TextInputDialogState::new(
            TextInputProps {
                text: "a b".into(),
                allow_empty: false,
            },
            Some(no_spaces()),
        );
        assert_eq!(state.error(), Some("no spaces allowed"));
        assert!(state.update(&Message::Ok).is_empty());

        state.update(&Message::TextChanged("ab".into()));
        assert!(state.error().is_none());
        assert!(state.can_confirm());
    }
}
