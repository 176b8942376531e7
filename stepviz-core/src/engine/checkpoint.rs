//! Checkpoint
//!
//! The only interface an algorithm author codes against. A checkpoint is a
//! point where the algorithm voluntarily suspends and hands control back
//! to the driver.
//!
//! # Contract
//!
//! Calling [`Checkpoint::pause`]:
//!
//! 1. raises a render notification,
//! 2. blocks the algorithm thread until the driver calls `step`,
//! 3. returns `false` to proceed or `true` to abort.
//!
//! An algorithm must check the returned flag after every call and return
//! from `run` promptly when it is `true`. Cancellation is cooperative: an
//! algorithm that ignores the flag keeps mutating a graph its owner has
//! abandoned.
//!
//! Pauses must not happen while holding graph access; `GraphMut`'s closure
//! API makes that the natural shape.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::notify::{EventOrigin, RenderEvent, RenderNotifier};
use super::run::RunShared;
use super::state::{RunId, RunState};

/// Handle through which an algorithm yields to the driver.
pub struct Checkpoint {
    run: Arc<RunShared>,
    notifier: Arc<RenderNotifier>,
}

impl Checkpoint {
    pub(crate) fn new(run: Arc<RunShared>, notifier: Arc<RenderNotifier>) -> Self {
        Self { run, notifier }
    }

    /// Suspend until the driver steps. Returns `true` when the run has been
    /// killed and the algorithm must return now.
    ///
    /// Once it has returned `true` it keeps returning `true` without
    /// blocking.
    pub fn pause(&self) -> bool {
        if self.run.abort_seen() || self.run.state() == RunState::Killed {
            return self.observe_abort();
        }

        let index = self.run.enter_checkpoint();
        debug!(run = %self.run.id, checkpoint = index, "algorithm parked at checkpoint");
        self.notifier.emit(RenderEvent {
            run: self.run.id,
            checkpoint: index,
            origin: EventOrigin::Checkpoint,
        });

        match self.run.rendezvous.arrive_and_wait() {
            Ok(()) => false,
            Err(_) => self.observe_abort(),
        }
    }

    fn observe_abort(&self) -> bool {
        if !self.run.abort_seen() {
            self.run.latch_abort();
            debug!(run = %self.run.id, "checkpoint observed abort");
        }
        true
    }

    /// Whether a previous `pause` has returned the abort signal.
    pub fn is_aborted(&self) -> bool {
        self.run.abort_seen()
    }

    /// Run this checkpoint belongs to.
    pub fn run_id(&self) -> RunId {
        self.run.id
    }

    /// Number of checkpoints entered so far in this run.
    pub fn index(&self) -> u64 {
        self.run.checkpoints()
    }
}

impl fmt::Debug for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoint")
            .field("run", &self.run.id)
            .field("index", &self.index())
            .field("aborted", &self.is_aborted())
            .finish()
    }
}
