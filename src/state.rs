//! Mounted dialog: session state + injected collaborators + host callbacks.
//!
//! `Dialog<D>` is a cheap `Rc` handle.  All mutation goes through
//! [`Dialog::dispatch`], which runs the reducer with the state borrowed and
//! executes the resulting commands only after the borrow is released, so
//! callbacks and deferred tasks may dispatch again.  A dispatch from inside a
//! host callback only queues its commands; the executor already on the stack
//! runs them after the callback returns.

use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::callbacks::DialogCallbacks;
use crate::command_executors;
use crate::dialogs::DialogState;
use crate::env::DialogEnv;
use crate::messages::{Command, Message};

pub struct Dialog<D: DialogState> {
    state: Rc<RefCell<D>>,
    env: DialogEnv,
    callbacks: Rc<RefCell<Box<dyn DialogCallbacks>>>,
    closed: Rc<Cell<bool>>,
    pending: Rc<RefCell<VecDeque<Command>>>,
    draining: Rc<Cell<bool>>,
}

impl<D: DialogState> Clone for Dialog<D> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            env: self.env.clone(),
            callbacks: Rc::clone(&self.callbacks),
            closed: Rc::clone(&self.closed),
            pending: Rc::clone(&self.pending),
            draining: Rc::clone(&self.draining),
        }
    }
}

impl<D: DialogState> Dialog<D> {
    /// Mount a dialog and run the commands its constructor produced.
    pub fn mount(
        state: D,
        initial: Vec<Command>,
        env: DialogEnv,
        callbacks: impl DialogCallbacks + 'static,
    ) -> Self {
        let dialog = Self {
            state: Rc::new(RefCell::new(state)),
            env,
            callbacks: Rc::new(RefCell::new(Box::new(callbacks))),
            closed: Rc::new(Cell::new(false)),
            pending: Rc::new(RefCell::new(VecDeque::new())),
            draining: Rc::new(Cell::new(false)),
        };
        command_executors::execute(&dialog, initial);
        dialog
    }

    /// Feed one event through the reducer.  Ignored once the dialog closed.
    pub fn dispatch(&self, msg: Message) {
        if self.closed.get() {
            crate::debug_log!("{} closed, dropping {:?}", self.state.borrow().kind(), msg);
            return;
        }
        let commands = self.state.borrow_mut().update(&msg);
        command_executors::execute(self, commands);
    }

    pub fn state(&self) -> Ref<'_, D> {
        self.state.borrow()
    }

    pub fn env(&self) -> &DialogEnv {
        &self.env
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub(crate) fn callbacks(&self) -> &RefCell<Box<dyn DialogCallbacks>> {
        &self.callbacks
    }

    /// Flip to closed; true only for the first caller.
    pub(crate) fn mark_closed(&self) -> bool {
        !self.closed.replace(true)
    }

    pub(crate) fn enqueue(&self, commands: Vec<Command>) {
        self.pending.borrow_mut().extend(commands);
    }

    /// Next queued command; the queue is not borrowed once this returns.
    pub(crate) fn next_pending(&self) -> Option<Command> {
        self.pending.borrow_mut().pop_front()
    }

    /// Claim the executor role; false when an outer call already drains.
    pub(crate) fn begin_drain(&self) -> bool {
        !self.draining.replace(true)
    }

    pub(crate) fn end_drain(&self) {
        self.draining.set(false);
    }
}
