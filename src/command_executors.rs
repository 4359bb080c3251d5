//! Executes reducer commands against the dialog's collaborators.

use crate::dialogs::DialogState;
use crate::filters::FilterStore;
use crate::messages::Command;
use crate::state::Dialog;
use crate::suppression::SuppressionGate;

/// Queue `commands` and, unless an outer call is already draining the queue,
/// run them in order.  Host callbacks that dispatch again land here with the
/// callbacks still borrowed, so they must only enqueue.
pub fn execute<D: DialogState>(dialog: &Dialog<D>, commands: Vec<Command>) {
    dialog.enqueue(commands);
    if !dialog.begin_drain() {
        return;
    }
    while let Some(cmd) = dialog.next_pending() {
        execute_one(dialog, cmd);
    }
    dialog.end_drain();
}

fn execute_one<D: DialogState>(dialog: &Dialog<D>, cmd: Command) {
    let env = dialog.env();
    match cmd {
        Command::Ok { value, display_name } => {
            if dialog.is_closed() {
                log::warn!("dropping Ok {:?} after close", value);
                return;
            }
            dialog.callbacks().borrow_mut().on_ok(value, display_name);
        }
        Command::Close => {
            if dialog.mark_closed() {
                dialog.callbacks().borrow_mut().on_close();
            }
        }
        Command::SaveFilters {
            kind,
            dialog_name,
            record,
        } => {
            FilterStore::new(env.store.as_ref(), kind).save(&dialog_name, &record);
        }
        Command::Suppress { dialog_name, minutes } => {
            let gate = SuppressionGate::new(env.store.as_ref(), env.clock.as_ref());
            if let Err(e) = gate.suppress_for(&dialog_name, minutes) {
                log::warn!("could not store suppression for {}: {}", dialog_name, e);
            }
        }
        Command::SendMessageLater { delay_ms, message } => {
            let target = dialog.clone();
            env.scheduler
                .defer(delay_ms, Box::new(move || target.dispatch(message)));
        }
    }
}
