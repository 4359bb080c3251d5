//! Wall-clock access for the suppression window.

use std::cell::Cell;

/// Source of "now" in **milliseconds** since UNIX epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Real clock.  `chrono` reads `Date.now()` under wasm (via the `wasmbind`
/// feature) and the system clock natively, so the same code runs in both.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: i64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}
