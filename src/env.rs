//! Collaborators injected into every dialog: persistent store, clock and a
//! scheduler for deferred work.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::clock::{Clock, SystemClock};
use crate::config::DialogSettings;
use crate::error::DialogError;
use crate::storage::KeyValueStore;

pub type Task = Box<dyn FnOnce() + 'static>;

/// Runs a task later on the same event loop.  Fire-and-forget: there is no
/// cancellation.
pub trait Scheduler {
    fn defer(&self, delay_ms: u32, task: Task);
}

/// Browser event-loop scheduler (`setTimeout` through gloo timers).
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn defer(&self, delay_ms: u32, task: Task) {
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(delay_ms).await;
            task();
        });
    }
}

/// Queue that only runs when told to.  Lets tests observe that deferred work
/// did *not* happen synchronously.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Vec<(u32, Task)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run everything queued so far.  Tasks queued while running wait for the
    /// next call.  Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<(u32, Task)> = self.queue.borrow_mut().drain(..).collect();
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay_ms: u32, task: Task) {
        self.queue.borrow_mut().push((delay_ms, task));
    }
}

/// Everything a dialog needs from the outside world.  Cheap to clone.
#[derive(Clone)]
pub struct DialogEnv {
    pub store: Rc<dyn KeyValueStore>,
    pub clock: Rc<dyn Clock>,
    pub scheduler: Rc<dyn Scheduler>,
    pub settings: DialogSettings,
}

impl fmt::Debug for DialogEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogEnv")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl DialogEnv {
    pub fn builder() -> DialogEnvBuilder {
        DialogEnvBuilder::default()
    }
}

#[derive(Default)]
pub struct DialogEnvBuilder {
    store: Option<Rc<dyn KeyValueStore>>,
    clock: Option<Rc<dyn Clock>>,
    scheduler: Option<Rc<dyn Scheduler>>,
    settings: Option<DialogSettings>,
}

impl DialogEnvBuilder {
    pub fn store(mut self, store: Rc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn settings(mut self, settings: DialogSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Fails fast when the store is missing.  The clock defaults to the system
    /// clock; the scheduler defaults to the browser event loop on wasm and is
    /// required elsewhere.
    pub fn build(self) -> Result<DialogEnv, DialogError> {
        let store = self.store.ok_or(DialogError::MissingCollaborator("store"))?;
        let scheduler: Rc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None if cfg!(target_arch = "wasm32") => Rc::new(BrowserScheduler),
            None => return Err(DialogError::MissingCollaborator("scheduler")),
        };
        Ok(DialogEnv {
            store,
            clock: self
                .clock
                .unwrap_or_else(|| Rc::new(SystemClock) as Rc<dyn Clock>),
            scheduler,
            settings: self.settings.unwrap_or_default(),
        })
    }
}
