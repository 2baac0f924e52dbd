#![forbid(unsafe_code)]

//! Cooperative task scheduler.
//!
//! Continuations are plain messages. Timers fire once the scheduler's clock
//! reaches their due time; frame messages fire at the next frame boundary.
//! Nothing runs on another thread and nothing blocks: the owner drives the
//! scheduler by calling [`Scheduler::take_frame`] and [`Scheduler::advance_to`]
//! from its tick.
//!
//! # Invariants
//!
//! 1. Timers fire in due-time order; ties fire in scheduling order.
//! 2. A cancelled timer never fires.
//! 3. Frame messages queued while a frame is being run wait for the next one.

use std::time::Duration;

use tracing::trace;

use crate::view::NodeKey;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Who a timer belongs to. Node-owned timers are cancelled when the node is
/// disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOwner {
    /// The top-level controller; lives as long as the app.
    Controller,
    Node(NodeKey),
}

#[derive(Debug)]
struct Timer<M> {
    id: TaskId,
    due: Duration,
    owner: TaskOwner,
    msg: M,
}

/// Timer and frame queue for messages of type `M`.
#[derive(Debug)]
pub struct Scheduler<M> {
    now: Duration,
    timers: Vec<Timer<M>>,
    frame: Vec<M>,
    next_id: u64,
}

impl<M> Default for Scheduler<M> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            timers: Vec::new(),
            frame: Vec::new(),
            next_id: 0,
        }
    }
}

impl<M> Scheduler<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Deliver `msg` once `delay` has elapsed from now.
    pub fn after(&mut self, delay: Duration, owner: TaskOwner, msg: M) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let due = self.now.saturating_add(delay);
        // Keep sorted by due time; equal due times keep insertion order.
        let at = self.timers.partition_point(|timer| timer.due <= due);
        self.timers.insert(
            at,
            Timer {
                id,
                due,
                owner,
                msg,
            },
        );
        trace!(task = id.0, due_ms = due.as_millis() as u64, "scheduler.after");
        id
    }

    /// Deliver `msg` at the next frame boundary.
    pub fn next_frame(&mut self, msg: M) {
        self.frame.push(msg);
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        let cancelled = self.timers.len() != before;
        if cancelled {
            trace!(task = id.0, "scheduler.cancel");
        }
        cancelled
    }

    /// Cancel every timer owned by `owner`. Returns how many were cancelled.
    pub fn cancel_owned_by(&mut self, owner: TaskOwner) -> usize {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.owner != owner);
        before - self.timers.len()
    }

    /// Messages queued for this frame boundary.
    pub fn take_frame(&mut self) -> Vec<M> {
        std::mem::take(&mut self.frame)
    }

    /// Move the clock to `now` (never backwards) and return the messages of
    /// every timer that came due, in firing order.
    pub fn advance_to(&mut self, now: Duration) -> Vec<M> {
        self.now = self.now.max(now);
        let due = self.timers.partition_point(|timer| timer.due <= self.now);
        self.timers.drain(..due).map(|timer| timer.msg).collect()
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether a frame message is queued.
    #[must_use]
    pub fn has_frame_work(&self) -> bool {
        !self.frame.is_empty()
    }

    /// Time at which the next timer is due.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.first().map(|timer| timer.due)
    }
}
