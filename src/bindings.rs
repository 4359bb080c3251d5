//! JavaScript surface of the dialog core.
//!
//! Free functions expose the pure pieces (normalizer, resolver, reconciler,
//! persistence helpers); the `*Handle` classes wrap mounted dialogs so the
//! host page only renders and forwards events.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::callbacks::DialogCallbacks;
use crate::clock::SystemClock;
use crate::config::DialogSettings;
use crate::dialogs::{
    open_confirm, open_message, open_picker, open_schedule, open_text_input, ConfirmDialogState,
    MessageDialogState, PickerDialogState, PickerKind, ScheduleDialogState, TextInputDialogState,
    Validator,
};
use crate::env::{BrowserScheduler, DialogEnv};
use crate::error::DialogError;
use crate::filters::{CustomFilter, FilterRecord, FilterStore};
use crate::messages::{Message, OkValue};
use crate::schedule::{normalize, resolve_mode, EditorMode, ModeFlags, ScheduleValue};
use crate::scheduling::{Frequency, FrequencyClassifier};
use crate::selection::{should_auto_confirm, IncomingSelection, SelectMode, SelectionSet};
use crate::state::Dialog;
use crate::storage::BrowserStore;
use crate::suppression::SuppressionGate;

const FILTER_FUNC_PROP: &str = "filterFunc";

// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    crate::logging::init(DialogSettings::from_build_env().log_level);
}

fn browser_env() -> Result<DialogEnv, DialogError> {
    DialogEnv::builder()
        .store(Rc::new(BrowserStore::local()?))
        .scheduler(Rc::new(BrowserScheduler))
        .settings(DialogSettings::from_build_env())
        .build()
}

/// Decode a props object; `undefined`/`null` mean "all defaults".
fn decode<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, DialogError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn parse_picker_kind(kind: &str) -> Result<PickerKind, DialogError> {
    match kind {
        "file" => Ok(PickerKind::File),
        "object" => Ok(PickerKind::Object),
        other => Err(DialogError::InvalidProps(format!("unknown picker kind '{}'", other))),
    }
}

fn ok_value_to_js(value: &OkValue) -> JsValue {
    match value {
        OkValue::Single(id) => JsValue::from_str(id),
        OkValue::Multiple(ids) => ids.iter().map(|id| JsValue::from_str(id)).collect::<Array>().into(),
        OkValue::Cleared => JsValue::FALSE,
        OkValue::Confirmed => JsValue::TRUE,
    }
}

/// Host callbacks given as plain JS functions.
struct JsCallbacks {
    on_ok: Function,
    on_close: Function,
}

impl DialogCallbacks for JsCallbacks {
    fn on_ok(&mut self, value: OkValue, display_name: Option<String>) {
        let name = display_name.map(JsValue::from).unwrap_or(JsValue::UNDEFINED);
        if let Err(e) = self.on_ok.call2(&JsValue::NULL, &ok_value_to_js(&value), &name) {
            log::error!("onOk handler threw: {:?}", e);
        }
    }

    fn on_close(&mut self) {
        if let Err(e) = self.on_close.call0(&JsValue::NULL) {
            log::error!("onClose handler threw: {:?}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = normalizeSchedule)]
pub fn normalize_schedule(raw: Option<String>) -> String {
    normalize(raw.as_deref()).as_str().to_string()
}

#[wasm_bindgen(js_name = resolveEditorMode)]
pub fn resolve_editor_mode(flags: JsValue, raw: Option<String>) -> Result<String, JsValue> {
    let flags: ModeFlags = decode(flags)?;
    let value = normalize(raw.as_deref());
    Ok(resolve_mode(&flags, &value, &FrequencyClassifier).to_string())
}

#[wasm_bindgen(js_name = shouldAutoConfirm)]
pub fn should_auto_confirm_js(is_double_click: bool, is_folder: bool, select_only_folders: bool) -> bool {
    should_auto_confirm(is_double_click, is_folder, select_only_folders)
}

#[wasm_bindgen(js_name = reconcileSelection)]
pub fn reconcile_selection(current: JsValue, incoming: JsValue, multi_select: bool) -> Result<JsValue, JsValue> {
    let mode = SelectMode::from_multi(multi_select);
    let current: Vec<String> = decode(current)?;
    let incoming: IncomingSelection = serde_wasm_bindgen::from_value(incoming).map_err(DialogError::from)?;
    let next = SelectionSet::from_ids(current, mode).reconcile(incoming, mode);
    Ok(serde_wasm_bindgen::to_value(&next).map_err(DialogError::from)?)
}

#[wasm_bindgen(js_name = loadFilters)]
pub fn load_filters(picker_kind: &str, dialog_name: &str) -> Result<JsValue, JsValue> {
    let kind = parse_picker_kind(picker_kind)?;
    let store = BrowserStore::local()?;
    let record = FilterStore::new(&store, kind.dialog_kind()).load(dialog_name);
    Ok(serde_wasm_bindgen::to_value(&record).map_err(DialogError::from)?)
}

#[wasm_bindgen(js_name = saveFilters)]
pub fn save_filters(picker_kind: &str, dialog_name: &str, record: JsValue) -> Result<(), JsValue> {
    let kind = parse_picker_kind(picker_kind)?;
    let record: FilterRecord = decode(record)?;
    let store = BrowserStore::local()?;
    FilterStore::new(&store, kind.dialog_kind()).save(dialog_name, &record);
    Ok(())
}

#[wasm_bindgen(js_name = isSuppressed)]
pub fn is_suppressed(dialog_name: &str) -> Result<bool, JsValue> {
    let store = BrowserStore::local()?;
    Ok(SuppressionGate::new(&store, &SystemClock).is_suppressed(dialog_name))
}

#[wasm_bindgen(js_name = suppressFor)]
pub fn suppress_for(dialog_name: &str, minutes: u32) -> Result<(), JsValue> {
    let store = BrowserStore::local()?;
    SuppressionGate::new(&store, &SystemClock).suppress_for(dialog_name, minutes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Dialog handles
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct ConfirmDialogHandle {
    inner: Dialog<ConfirmDialogState>,
}

#[wasm_bindgen]
impl ConfirmDialogHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(props: JsValue, on_ok: Function, on_close: Function) -> Result<ConfirmDialogHandle, JsValue> {
        let env = browser_env()?;
        let inner = open_confirm(decode(props)?, env, JsCallbacks { on_ok, on_close });
        Ok(Self { inner })
    }

    /// False while the dialog auto-confirms; the host must not render it.
    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.inner.state().is_visible()
    }

    #[wasm_bindgen(getter, js_name = offersSuppression)]
    pub fn offers_suppression(&self) -> bool {
        self.inner.state().offers_suppression()
    }

    #[wasm_bindgen(js_name = setSuppress)]
    pub fn set_suppress(&self, checked: bool) {
        self.inner.dispatch(Message::ToggleSuppress(checked));
    }

    pub fn ok(&self) {
        self.inner.dispatch(Message::Ok);
    }

    pub fn cancel(&self) {
        self.inner.dispatch(Message::Cancel);
    }
}

#[wasm_bindgen]
pub struct MessageDialogHandle {
    inner: Dialog<MessageDialogState>,
}

#[wasm_bindgen]
impl MessageDialogHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(on_ok: Function, on_close: Function) -> Result<MessageDialogHandle, JsValue> {
        let env = browser_env()?;
        let inner = open_message(env, JsCallbacks { on_ok, on_close });
        Ok(Self { inner })
    }

    pub fn ok(&self) {
        self.inner.dispatch(Message::Ok);
    }

    pub fn cancel(&self) {
        self.inner.dispatch(Message::Cancel);
    }
}

/// Wrap a JS validator: a non-empty string return is the error text.
fn js_validator(validate: Function) -> Validator {
    Rc::new(move |text: &str| match validate.call1(&JsValue::NULL, &JsValue::from_str(text)) {
        Ok(result) => result.as_string().filter(|msg| !msg.is_empty()),
        Err(e) => {
            log::warn!("validator threw: {:?}", e);
            Some(e.as_string().unwrap_or_else(|| "invalid input".to_string()))
        }
    })
}

#[wasm_bindgen]
pub struct TextInputDialogHandle {
    inner: Dialog<TextInputDialogState>,
}

#[wasm_bindgen]
impl TextInputDialogHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        props: JsValue,
        validate: Option<Function>,
        on_ok: Function,
        on_close: Function,
    ) -> Result<TextInputDialogHandle, JsValue> {
        let env = browser_env()?;
        let inner = open_text_input(
            decode(props)?,
            validate.map(js_validator),
            env,
            JsCallbacks { on_ok, on_close },
        );
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.state().text().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.state().error().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = canConfirm)]
    pub fn can_confirm(&self) -> bool {
        self.inner.state().can_confirm()
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: String) {
        self.inner.dispatch(Message::TextChanged(text));
    }

    pub fn ok(&self) {
        self.inner.dispatch(Message::Ok);
    }

    pub fn cancel(&self) {
        self.inner.dispatch(Message::Cancel);
    }
}

#[wasm_bindgen]
pub struct ScheduleDialogHandle {
    inner: Dialog<ScheduleDialogState>,
}

#[wasm_bindgen]
impl ScheduleDialogHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(props: JsValue, on_ok: Function, on_close: Function) -> Result<ScheduleDialogHandle, JsValue> {
        let env = browser_env()?;
        let inner = open_schedule(decode(props)?, env, JsCallbacks { on_ok, on_close });
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.state().mode().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> String {
        self.inner.state().value().as_str().to_string()
    }

    /// Human-readable line for simple schedules, `undefined` otherwise.
    #[wasm_bindgen(getter)]
    pub fn summary(&self) -> Option<String> {
        match self.inner.state().value() {
            ScheduleValue::Cron(cron) => Frequency::try_from(cron.as_str()).ok().map(|f| f.to_string()),
            ScheduleValue::Wizard(_) => None,
        }
    }

    #[wasm_bindgen(js_name = switchMode)]
    pub fn switch_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode: EditorMode = mode.parse()?;
        self.inner.dispatch(Message::SwitchMode(mode));
        Ok(())
    }

    pub fn edit(&self, raw: String) {
        self.inner.dispatch(Message::ScheduleEdited(raw));
    }

    /// Write back a simple-editor pick, e.g. `{ daily: { hour: 5, minute: 0 } }`.
    #[wasm_bindgen(js_name = setFrequency)]
    pub fn set_frequency(&self, frequency: JsValue) -> Result<(), JsValue> {
        let frequency: Frequency = serde_wasm_bindgen::from_value(frequency).map_err(DialogError::from)?;
        self.inner.dispatch(Message::FrequencyPicked(frequency));
        Ok(())
    }

    pub fn ok(&self) {
        self.inner.dispatch(Message::Ok);
    }

    pub fn clear(&self) {
        self.inner.dispatch(Message::Clear);
    }

    pub fn cancel(&self) {
        self.inner.dispatch(Message::Cancel);
    }
}

#[wasm_bindgen]
pub struct PickerDialogHandle {
    inner: Dialog<PickerDialogState>,
}

/// Split the `filterFunc` prop off the props object: functions become
/// predicates, strings the flag-gated legacy source.
fn take_custom_filter(props: &JsValue) -> Result<(JsValue, Option<CustomFilter>), DialogError> {
    let Some(obj) = props.dyn_ref::<Object>() else {
        return Ok((props.clone(), None));
    };
    let key = JsValue::from_str(FILTER_FUNC_PROP);
    let raw = Reflect::get(obj, &key).map_err(|e| DialogError::InvalidProps(format!("{:?}", e)))?;

    let filter = if let Some(func) = raw.dyn_ref::<Function>() {
        let func = func.clone();
        Some(CustomFilter::predicate(move |object| {
            let arg = match serde_wasm_bindgen::to_value(object) {
                Ok(arg) => arg,
                Err(e) => {
                    log::warn!("could not pass object to filterFunc: {}", e);
                    return true;
                }
            };
            match func.call1(&JsValue::NULL, &arg) {
                Ok(result) => result.is_truthy(),
                Err(e) => {
                    log::warn!("filterFunc threw: {:?}", e);
                    true
                }
            }
        }))
    } else {
        raw.as_string().map(CustomFilter::LegacySource)
    };

    let rest = Object::assign(&Object::new(), obj);
    Reflect::delete_property(&rest, &key).map_err(|e| DialogError::InvalidProps(format!("{:?}", e)))?;
    Ok((rest.into(), filter))
}

#[wasm_bindgen]
impl PickerDialogHandle {
    /// `kind` is `"file"` or `"object"`.
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, props: JsValue, on_ok: Function, on_close: Function) -> Result<PickerDialogHandle, JsValue> {
        let kind = parse_picker_kind(kind)?;
        let (props, custom_filter) = take_custom_filter(&props)?;
        let env = browser_env()?;
        let inner = open_picker(kind, decode(props)?, custom_filter, env, JsCallbacks { on_ok, on_close });
        Ok(Self { inner })
    }

    /// Forward a selection event from the browsing widget.
    pub fn select(
        &self,
        selection: JsValue,
        is_double_click: bool,
        is_folder: bool,
        display_name: Option<String>,
    ) -> Result<(), JsValue> {
        let selection: IncomingSelection = serde_wasm_bindgen::from_value(selection).map_err(DialogError::from)?;
        self.inner.dispatch(Message::SelectionChanged {
            selection,
            is_double_click,
            is_folder,
            display_name,
        });
        Ok(())
    }

    #[wasm_bindgen(js_name = setFilters)]
    pub fn set_filters(&self, record: JsValue) -> Result<(), JsValue> {
        let record: FilterRecord = decode(record)?;
        self.inner.dispatch(Message::FiltersChanged(record));
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn filters(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.state().filters()).map_err(DialogError::from)?)
    }

    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.state().selection()).map_err(DialogError::from)?)
    }

    #[wasm_bindgen(getter, js_name = canConfirm)]
    pub fn can_confirm(&self) -> bool {
        self.inner.state().can_confirm()
    }

    /// Custom filter check for one browsed object.
    pub fn accepts(&self, object: JsValue) -> Result<bool, JsValue> {
        let object: serde_json::Value = serde_wasm_bindgen::from_value(object).map_err(DialogError::from)?;
        Ok(self.inner.state().accepts(&object))
    }

    pub fn ok(&self) {
        self.inner.dispatch(Message::Ok);
    }

    pub fn cancel(&self) {
        self.inner.dispatch(Message::Cancel);
    }
}
