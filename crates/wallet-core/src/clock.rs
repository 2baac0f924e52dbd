#![forbid(unsafe_code)]

//! Monotonic time sources.
//!
//! The engine is driven with "time since start" values. [`SystemClock`] reads
//! the platform monotonic clock (native and wasm alike via `web-time`);
//! [`ManualClock`] is advanced by hand for deterministic tests and replays.

use std::cell::Cell;
use std::time::Duration;

use web_time::Instant;

/// A source of monotonic elapsed time.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;
}

/// Wall-clock backed monotonic time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `dt` and return the new reading.
    pub fn advance(&self, dt: Duration) -> Duration {
        let next = self.now.get().saturating_add(dt);
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
