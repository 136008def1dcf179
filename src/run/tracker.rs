//! Completion tracking for one run.
//!
//! The in-flight count and the dispatcher's hold share a single atomic word: bit 0
//! is the hold taken by `start()` and released by `seal()`, the remaining bits count
//! in-flight requests. Every transition is one atomic read-modify-write and the run
//! is released by whichever transition produces zero, so the release fires exactly
//! once even when the last two completions race, and an empty batch is released by
//! `seal()` itself.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use log::warn;
use tokio::sync::Notify;

const HOLD: usize = 1;
const REQUEST: usize = 2;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const COMPLETE: u8 = 2;

/// Lifecycle of a run as seen by its tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No dispatch has started
    Idle,
    /// Dispatch started and not every request has completed
    Running,
    /// Every dispatched request has completed (terminal)
    Complete,
}

/// Counts in-flight requests and releases waiters when the count reaches zero.
#[derive(Debug)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    completions: AtomicUsize,
    state: AtomicU8,
    released: Notify,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTracker {
    /// A tracker in the `Idle` state.
    pub fn new() -> Self {
        Self {
            outstanding: AtomicUsize::new(0),
            completions: AtomicUsize::new(0),
            state: AtomicU8::new(IDLE),
            released: Notify::new(),
        }
    }

    /// `Idle -> Running`. Takes the dispatch hold so the count cannot be observed
    /// as zero while requests are still being submitted.
    ///
    /// Returns `false` (and changes nothing) if the tracker was already started.
    pub fn start(&self) -> bool {
        if self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Completion tracker started twice; ignoring");
            return false;
        }
        self.outstanding.store(HOLD, Ordering::SeqCst);
        true
    }

    /// Counts one request. Must be called before the request is submitted.
    pub fn register(&self) -> bool {
        if self.state() != TrackerState::Running {
            warn!("Request registered on a tracker that is not running; ignoring");
            return false;
        }
        self.outstanding.fetch_add(REQUEST, Ordering::SeqCst);
        true
    }

    /// Releases the dispatch hold once every request has been submitted.
    ///
    /// Returns `true` if this call completed the run (nothing was in flight).
    pub fn seal(&self) -> bool {
        match self.transition(|n| (n & HOLD == HOLD).then(|| n - HOLD)) {
            Some(remaining) => remaining == 0 && self.release(),
            None => {
                warn!("Completion tracker sealed twice; ignoring");
                false
            }
        }
    }

    /// Records one completion.
    ///
    /// Returns `true` if this completion completed the run. A completion with
    /// nothing in flight is logged and ignored; the count never goes negative.
    pub fn complete_one(&self) -> bool {
        match self.transition(|n| (n >= REQUEST).then(|| n - REQUEST)) {
            Some(remaining) => {
                self.completions.fetch_add(1, Ordering::SeqCst);
                remaining == 0 && self.release()
            }
            None => {
                warn!("Completion received with nothing in flight; ignoring");
                false
            }
        }
    }

    /// Applies `step` atomically. Returns the new value, or `None` if `step` refused.
    fn transition(&self, step: impl Fn(usize) -> Option<usize>) -> Option<usize> {
        self.outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, &step)
            .ok()
            .and_then(step)
    }

    fn release(&self) -> bool {
        self.state.store(COMPLETE, Ordering::SeqCst);
        self.released.notify_waiters();
        true
    }

    /// Waits until the run is complete. Returns immediately if it already is.
    pub async fn wait(&self) {
        loop {
            let notified = self.released.notified();
            if self.state() == TrackerState::Complete {
                return;
            }
            notified.await;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        match self.state.load(Ordering::SeqCst) {
            IDLE => TrackerState::Idle,
            RUNNING => TrackerState::Running,
            _ => TrackerState::Complete,
        }
    }

    /// Requests submitted but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst) / REQUEST
    }

    /// Completions recorded so far.
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}
