//! Picker selection state and confirm policy shared by the file and object
//! pickers.

use serde::{Deserialize, Serialize};

/// Selection as reported by the browsing widget: a single id or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncomingSelection {
    One(String),
    Many(Vec<String>),
}

impl IncomingSelection {
    fn into_vec(self) -> Vec<String> {
        match self {
            IncomingSelection::One(id) => vec![id],
            IncomingSelection::Many(ids) => ids,
        }
    }
}

impl From<&str> for IncomingSelection {
    fn from(id: &str) -> Self {
        IncomingSelection::One(id.to_string())
    }
}

impl From<String> for IncomingSelection {
    fn from(id: String) -> Self {
        IncomingSelection::One(id)
    }
}

impl From<Vec<String>> for IncomingSelection {
    fn from(ids: Vec<String>) -> Self {
        IncomingSelection::Many(ids)
    }
}

impl From<Vec<&str>> for IncomingSelection {
    fn from(ids: Vec<&str>) -> Self {
        IncomingSelection::Many(ids.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    Single,
    Multiple,
}

impl SelectMode {
    pub fn from_multi(multi_select: bool) -> Self {
        if multi_select {
            SelectMode::Multiple
        } else {
            SelectMode::Single
        }
    }
}

/// Ordered, deduplicated ids; never contains an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet(Vec<String>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary ids, applying the set invariants.
    pub fn from_ids<I, S>(ids: I, mode: SelectMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for id in ids.into_iter().map(Into::into) {
            if id.is_empty() || out.contains(&id) {
                continue;
            }
            out.push(id);
            if mode == SelectMode::Single {
                break;
            }
        }
        Self(out)
    }

    /// The widget always reports the complete new selection, so `incoming`
    /// replaces `self`.
    pub fn reconcile(&self, incoming: IncomingSelection, mode: SelectMode) -> SelectionSet {
        let next = Self::from_ids(incoming.into_vec(), mode);
        if next != *self {
            crate::debug_log!("selection {:?} -> {:?}", self.0, next.0);
        }
        next
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Double-click fast confirm: files (non-folders) confirm in a normal picker,
/// folders confirm in a folder-only picker.
pub fn should_auto_confirm(is_double_click: bool, is_folder: bool, select_only_folders: bool) -> bool {
    is_double_click
        && ((!select_only_folders && !is_folder) || (select_only_folders && is_folder))
}

/// Whether the explicit Ok button is enabled.
pub fn can_confirm(selection: &SelectionSet, select_only_folders: bool, last_is_folder: bool) -> bool {
    if selection.is_empty() {
        return false;
    }
    !(select_only_folders && selection.len() == 1 && !last_is_folder)
}
