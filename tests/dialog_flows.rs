//! End-to-end dialog flows against in-memory collaborators.
//!
//! Run with: cargo test --test dialog_flows

use std::cell::RefCell;
use std::rc::Rc;

use admin_dialogs::callbacks::{DialogCallbacks, DialogEvent, RecordedCallbacks};
use admin_dialogs::clock::ManualClock;
use admin_dialogs::config::DialogSettings;
use admin_dialogs::dialogs::{
    open_confirm, open_picker, open_schedule, open_text_input, ConfirmProps, PickerKind, PickerProps,
    ScheduleDialogState, ScheduleProps, TextInputProps, Validator,
};
use admin_dialogs::env::{DialogEnv, ManualScheduler};
use admin_dialogs::filters::{fields, CustomFilter, FilterRecord};
use admin_dialogs::messages::{Message, OkValue};
use admin_dialogs::schedule::{EditorMode, ModeFlags};
use admin_dialogs::scheduling::Frequency;
use admin_dialogs::state::Dialog;
use admin_dialogs::storage::{KeyValueStore, MemoryStore};

const MINUTE: i64 = 60_000;

struct Harness {
    store: Rc<MemoryStore>,
    clock: Rc<ManualClock>,
    scheduler: Rc<ManualScheduler>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: Rc::new(MemoryStore::new()),
            clock: Rc::new(ManualClock::new(1_700_000_000_000)),
            scheduler: Rc::new(ManualScheduler::new()),
        }
    }

    fn env(&self) -> DialogEnv {
        DialogEnv::builder()
            .store(self.store.clone())
            .clock(self.clock.clone())
            .scheduler(self.scheduler.clone())
            .build()
            .expect("all collaborators provided")
    }
}

fn select(ids: Vec<&str>, is_double_click: bool, is_folder: bool) -> Message {
    Message::SelectionChanged {
        selection: ids.into(),
        is_double_click,
        is_folder,
        display_name: None,
    }
}

#[test]
fn schedule_without_value_opens_wizard() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let dialog = open_schedule(ScheduleProps::default(), h.env(), events.clone());

    assert_eq!(dialog.state().mode(), EditorMode::Wizard);
    assert_eq!(dialog.state().value().as_str(), "{}");

    dialog.dispatch(Message::Ok);
    assert_eq!(events.ok_values(), vec![OkValue::Single("{}".into())]);
    assert_eq!(events.close_count(), 1);
}

#[test]
fn quoted_daily_cron_opens_simple_and_clear_reports_false() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let props = ScheduleProps {
        cron: Some("\"0 5 * * *\"".into()),
        ..Default::default()
    };
    let dialog = open_schedule(props, h.env(), events.clone());

    assert_eq!(dialog.state().mode(), EditorMode::Simple);
    assert_eq!(dialog.state().value().as_str(), "0 5 * * *");

    dialog.dispatch(Message::Clear);
    assert_eq!(events.ok_values(), vec![OkValue::Cleared]);
}

#[test]
fn multi_file_picker_double_click_on_folder_does_not_confirm() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let props = PickerProps {
        multi_select: true,
        ..Default::default()
    };
    let dialog = open_picker(PickerKind::File, props, None, h.env(), events.clone());

    dialog.dispatch(select(vec!["/data/logs"], true, true));
    assert!(events.events().is_empty());

    // a file does
    dialog.dispatch(select(vec!["/data/logs/app.log"], true, false));
    assert_eq!(events.ok_values(), vec![OkValue::Multiple(vec!["/data/logs/app.log".into()])]);
    assert_eq!(events.close_count(), 1);
}

#[test]
fn folder_only_picker_confirms_folder_on_double_click() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let props = PickerProps {
        multi_select: true,
        select_only_folders: true,
        ..Default::default()
    };
    let dialog = open_picker(PickerKind::File, props, None, h.env(), events.clone());

    // a file does not qualify
    dialog.dispatch(select(vec!["/data/app.log"], true, false));
    assert!(events.events().is_empty());
    assert!(!dialog.state().can_confirm());

    dialog.dispatch(select(vec!["/data"], true, true));
    assert_eq!(events.ok_values(), vec![OkValue::Multiple(vec!["/data".into()])]);
}

#[test]
fn single_click_never_confirms() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let dialog = open_picker(PickerKind::File, PickerProps::default(), None, h.env(), events.clone());

    dialog.dispatch(select(vec!["/data/app.log"], false, false));
    assert!(events.events().is_empty());

    dialog.dispatch(Message::Ok);
    assert_eq!(events.ok_values(), vec![OkValue::Single("/data/app.log".into())]);
}

#[test]
fn confirm_suppression_round_trip() {
    let h = Harness::new();
    let props = ConfirmProps {
        dialog_name: Some("deleteObject".into()),
        suppress_question_minutes: Some(5),
    };

    // first open: visible, user ticks the box and confirms
    let first = RecordedCallbacks::new();
    let dialog = open_confirm(props.clone(), h.env(), first.clone());
    assert!(dialog.state().is_visible());
    assert!(dialog.state().offers_suppression());
    dialog.dispatch(Message::ToggleSuppress(true));
    dialog.dispatch(Message::Ok);
    assert_eq!(first.ok_values(), vec![OkValue::Confirmed]);
    assert!(h.store.contains("ConfirmDialog.deleteObject"));

    // within the window: auto-confirms, but not synchronously
    h.clock.advance(MINUTE);
    let second = RecordedCallbacks::new();
    let dialog = open_confirm(props.clone(), h.env(), second.clone());
    assert!(!dialog.state().is_visible());
    assert!(second.events().is_empty());
    assert_eq!(h.scheduler.run_pending(), 1);
    assert_eq!(
        second.events(),
        vec![
            DialogEvent::Ok {
                value: OkValue::Confirmed,
                display_name: None,
            },
            DialogEvent::Close,
        ]
    );

    // past the window: asks again and the record is gone
    h.clock.advance(5 * MINUTE);
    let third = RecordedCallbacks::new();
    let dialog = open_confirm(props, h.env(), third.clone());
    assert!(dialog.state().is_visible());
    assert!(!h.store.contains("ConfirmDialog.deleteObject"));
    assert_eq!(h.scheduler.pending(), 0);
}

#[test]
fn cancel_after_auto_confirm_is_scheduled_fires_close_once() {
    let h = Harness::new();
    h.store
        .set("ConfirmDialog.restart", &(1_700_000_000_000 + MINUTE).to_string())
        .unwrap();
    let events = RecordedCallbacks::new();
    let props = ConfirmProps {
        dialog_name: Some("restart".into()),
        suppress_question_minutes: None,
    };
    let dialog = open_confirm(props, h.env(), events.clone());

    dialog.dispatch(Message::Cancel);
    h.scheduler.run_pending();
    assert_eq!(events.events(), vec![DialogEvent::Close]);
}

#[test]
fn picker_filters_persist_across_reopen() {
    let h = Harness::new();
    let props = PickerProps {
        dialog_name: Some("objects".into()),
        ..Default::default()
    };

    let dialog = open_picker(PickerKind::Object, props.clone(), None, h.env(), RecordedCallbacks::new());
    let record = FilterRecord::new().with(fields::ROOM, "kitchen").with(fields::ROLE, "switch");
    dialog.dispatch(Message::FiltersChanged(record.clone()));
    dialog.dispatch(Message::Cancel);

    let reopened = open_picker(PickerKind::Object, props, None, h.env(), RecordedCallbacks::new());
    assert_eq!(reopened.state().filters(), &record);

    // a file picker with the same name keeps its own record
    let files = PickerProps {
        dialog_name: Some("objects".into()),
        ..Default::default()
    };
    let file_picker = open_picker(PickerKind::File, files, None, h.env(), RecordedCallbacks::new());
    assert!(file_picker.state().filters().is_empty());
}

#[test]
fn text_input_reports_validated_text() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let validator: Validator = Rc::new(|text: &str| text.contains('.').then(|| "no dots".to_string()));
    let dialog = open_text_input(TextInputProps::default(), Some(validator), h.env(), events.clone());

    dialog.dispatch(Message::TextChanged("living.room".into()));
    assert_eq!(dialog.state().error(), Some("no dots"));
    dialog.dispatch(Message::Ok);
    assert!(events.events().is_empty());

    dialog.dispatch(Message::TextChanged("kitchen".into()));
    dialog.dispatch(Message::Ok);
    assert_eq!(events.ok_values(), vec![OkValue::Single("kitchen".into())]);
}

#[test]
fn object_picker_reports_display_name() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let dialog = open_picker(PickerKind::Object, PickerProps::default(), None, h.env(), events.clone());

    dialog.dispatch(Message::SelectionChanged {
        selection: "hm-rpc.0.LEQ123.1.STATE".into(),
        is_double_click: false,
        is_folder: false,
        display_name: Some("Kitchen light".into()),
    });
    assert_eq!(dialog.state().display_name(), Some("Kitchen light"));

    dialog.dispatch(Message::Ok);
    assert_eq!(
        events.events()[0],
        DialogEvent::Ok {
            value: OkValue::Single("hm-rpc.0.LEQ123.1.STATE".into()),
            display_name: Some("Kitchen light".into()),
        }
    );
}

#[test]
fn no_wizard_schedule_keeps_flags_for_the_session() {
    let h = Harness::new();
    let props = ScheduleProps {
        cron: None,
        flags: ModeFlags {
            no_wizard: true,
            ..Default::default()
        },
    };
    let dialog = open_schedule(props, h.env(), RecordedCallbacks::new());

    assert!(dialog.state().flags().no_wizard);
    assert_eq!(dialog.state().mode(), EditorMode::Simple);
    dialog.dispatch(Message::SwitchMode(EditorMode::Wizard));
    assert_eq!(dialog.state().mode(), EditorMode::Simple);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn settings_flow_into_dialogs() {
    let h = Harness::new();
    let settings = DialogSettings::default()
        .with_auto_confirm_delay(250)
        .with_legacy_filter_source(true);
    let env = DialogEnv::builder()
        .store(h.store.clone())
        .clock(h.clock.clone())
        .scheduler(h.scheduler.clone())
        .settings(settings)
        .build()
        .unwrap();
    assert_eq!(env.settings.auto_confirm_delay_ms, 250);

    let legacy = CustomFilter::LegacySource("return obj.type === 'state';".into());
    let dialog = open_picker(PickerKind::Object, PickerProps::default(), Some(legacy), env, RecordedCallbacks::new());
    // without a JS runtime the legacy source cannot run; nothing is filtered out
    assert!(dialog.state().accepts(&serde_json::json!({ "type": "channel" })));
}

/// Host whose onOk handler talks back to the dialog, the way a React host
/// closes its modal from inside the Ok handler.
struct ReenteringHost {
    dialog: Rc<RefCell<Option<Dialog<ScheduleDialogState>>>>,
    reply: Message,
    events: RecordedCallbacks,
}

impl DialogCallbacks for ReenteringHost {
    fn on_ok(&mut self, value: OkValue, display_name: Option<String>) {
        self.events.on_ok(value, display_name);
        if let Some(dialog) = self.dialog.borrow().as_ref() {
            dialog.dispatch(self.reply.clone());
        }
    }

    fn on_close(&mut self) {
        self.events.on_close();
    }
}

fn open_reentering(h: &Harness, reply: Message) -> (Dialog<ScheduleDialogState>, RecordedCallbacks) {
    let slot = Rc::new(RefCell::new(None));
    let events = RecordedCallbacks::new();
    let props = ScheduleProps {
        cron: Some("0 5 * * *".into()),
        ..Default::default()
    };
    let host = ReenteringHost {
        dialog: slot.clone(),
        reply,
        events: events.clone(),
    };
    let dialog = open_schedule(props, h.env(), host);
    *slot.borrow_mut() = Some(dialog.clone());
    (dialog, events)
}

#[test]
fn on_ok_may_cancel_the_dialog() {
    let h = Harness::new();
    let (dialog, events) = open_reentering(&h, Message::Cancel);

    dialog.dispatch(Message::Ok);

    assert!(dialog.is_closed());
    assert_eq!(
        events.events(),
        vec![
            DialogEvent::Ok {
                value: OkValue::Single("0 5 * * *".into()),
                display_name: None,
            },
            DialogEvent::Close,
        ]
    );
}

#[test]
fn on_ok_pressing_ok_again_reports_once() {
    let h = Harness::new();
    let (dialog, events) = open_reentering(&h, Message::Ok);

    dialog.dispatch(Message::Ok);
    dialog.dispatch(Message::Ok);

    assert_eq!(events.ok_values(), vec![OkValue::Single("0 5 * * *".into())]);
    assert_eq!(events.close_count(), 1);
}

#[test]
fn simple_editor_pick_is_reported_as_cron() {
    let h = Harness::new();
    let events = RecordedCallbacks::new();
    let dialog = open_schedule(ScheduleProps::default(), h.env(), events.clone());

    dialog.dispatch(Message::SwitchMode(EditorMode::Simple));
    dialog.dispatch(Message::FrequencyPicked(Frequency::EveryNHours { hours: 6, minute: 15 }));
    assert_eq!(dialog.state().value().as_str(), "15 */6 * * *");

    dialog.dispatch(Message::Ok);
    assert_eq!(events.ok_values(), vec![OkValue::Single("15 */6 * * *".into())]);
}
