//! File and object pickers.
//!
//! The browsing widget is external: it reports selection and filter changes
//! as messages and asks [`PickerDialogState::accepts`] whether an object
//! passes the caller's custom filter.  The dialog owns the canonical
//! selection, the confirm policy and filter persistence.

use std::fmt;

use serde::Deserialize;

use super::{DialogKind, DialogState};
use crate::config::DialogSettings;
use crate::filters::{merge, CustomFilter, FilterRecord, FilterStore, ObjectPredicate};
use crate::messages::{Command, Message, OkValue};
use crate::selection::{can_confirm, should_auto_confirm, IncomingSelection, SelectMode, SelectionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    /// Files and folders; the widget reports `is_folder`.
    File,
    /// Objects; no folder distinction, display names are captured.
    Object,
}

impl PickerKind {
    pub fn dialog_kind(&self) -> DialogKind {
        match self {
            PickerKind::File => DialogKind::SelectFile,
            PickerKind::Object => DialogKind::SelectObject,
        }
    }

    fn distinguishes_folders(&self) -> bool {
        matches!(self, PickerKind::File)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerProps {
    /// Key for persisted filters; unnamed pickers do not persist.
    pub dialog_name: Option<String>,
    pub multi_select: bool,
    pub select_only_folders: bool,
    /// Initially selected id(s).
    pub selected: Option<IncomingSelection>,
    /// Filter values that win over the persisted ones for this session.
    pub filters: Option<FilterRecord>,
}

#[derive(Clone)]
pub struct PickerDialogState {
    kind: PickerKind,
    dialog_name: Option<String>,
    mode: SelectMode,
    select_only_folders: bool,
    selection: SelectionSet,
    last_is_folder: bool,
    display_name: Option<String>,
    filters: FilterRecord,
    custom_filter: Option<ObjectPredicate>,
}

impl fmt::Debug for PickerDialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerDialogState")
            .field("kind", &self.kind)
            .field("dialog_name", &self.dialog_name)
            .field("mode", &self.mode)
            .field("select_only_folders", &self.select_only_folders)
            .field("selection", &self.selection)
            .field("last_is_folder", &self.last_is_folder)
            .field("display_name", &self.display_name)
            .field("filters", &self.filters)
            .field("custom_filter", &self.custom_filter.is_some())
            .finish()
    }
}

impl PickerDialogState {
    pub fn new(
        kind: PickerKind,
        props: PickerProps,
        store: &FilterStore<'_>,
        custom_filter: Option<CustomFilter>,
        settings: &DialogSettings,
    ) -> Self {
        let mode = SelectMode::from_multi(props.multi_select);
        let overrides = props.filters.unwrap_or_default();
        let filters = match &props.dialog_name {
            Some(name) => merge(&store.load(name), &overrides),
            None => overrides,
        };
        let selection = match props.selected {
            Some(selected) => SelectionSet::new().reconcile(selected, mode),
            None => SelectionSet::new(),
        };

        Self {
            kind,
            dialog_name: props.dialog_name,
            mode,
            select_only_folders: props.select_only_folders,
            selection,
            // Preselected items are trusted to match the picker's type.
            last_is_folder: props.select_only_folders,
            display_name: None,
            filters,
            custom_filter: custom_filter.and_then(|f| f.compile(settings.allow_legacy_filter_source)),
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn filters(&self) -> &FilterRecord {
        &self.filters
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn can_confirm(&self) -> bool {
        can_confirm(&self.selection, self.select_only_folders, self.last_is_folder)
    }

    /// Custom filter check for the browsing widget; no filter accepts all.
    pub fn accepts(&self, object: &serde_json::Value) -> bool {
        self.custom_filter.as_ref().map_or(true, |f| f(object))
    }

    fn confirm(&self) -> Vec<Command> {
        if !self.can_confirm() {
            crate::debug_log!("{} Ok ignored, selection {:?}", self.kind.dialog_kind(), self.selection);
            return Vec::new();
        }
        let value = match self.mode {
            SelectMode::Single => match self.selection.first() {
                Some(id) => OkValue::Single(id.to_string()),
                None => return Vec::new(),
            },
            SelectMode::Multiple => OkValue::Multiple(self.selection.ids().to_vec()),
        };
        let display_name = match self.kind {
            PickerKind::Object => self.display_name.clone(),
            PickerKind::File => None,
        };
        Command::confirm(value, display_name)
    }
}

impl DialogState for PickerDialogState {
    fn kind(&self) -> DialogKind {
        self.kind.dialog_kind()
    }

    fn update(&mut self, msg: &Message) -> Vec<Command> {
        match msg {
            Message::SelectionChanged {
                selection,
                is_double_click,
                is_folder,
                display_name,
            } => {
                let is_folder = *is_folder && self.kind.distinguishes_folders();
                self.selection = self.selection.reconcile(selection.clone(), self.mode);
                self.last_is_folder = is_folder;
                self.display_name = display_name.clone();

                if should_auto_confirm(*is_double_click, is_folder, self.select_only_folders) {
                    self.confirm()
                } else {
                    Vec::new()
                }
            }
            Message::FiltersChanged(record) => {
                self.filters = record.clone();
                match &self.dialog_name {
                    Some(name) => vec![Command::SaveFilters {
                        kind: self.kind.dialog_kind(),
                        dialog_name: name.clone(),
                        record: record.clone(),
                    }],
                    None => Vec::new(),
                }
            }
            Message::Ok => self.confirm(),
            Message::Cancel => vec![Command::Close],
            _ => Vec::new(),
        }
    }
}
