//! Per-run shared state.
//!
//! One `RunShared` exists per `start`. It is shared between the
//! controller (driver side) and the checkpoint handed to the algorithm
//! thread, and is dropped once both have let go of it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use parking_lot::Mutex;
use tracing::{error, info};

use super::state::{RunId, RunState};
use crate::algorithm::AlgorithmDescriptor;
use crate::sync::Rendezvous;

pub(crate) struct RunShared {
    pub(crate) id: RunId,
    pub(crate) descriptor: AlgorithmDescriptor,
    pub(crate) rendezvous: Rendezvous,
    state: Mutex<RunState>,
    /// Checkpoints the algorithm has entered.
    checkpoints: AtomicU64,
    /// Latched once a checkpoint has returned the abort signal.
    abort_seen: AtomicBool,
}

impl RunShared {
    /// A run that is live from the moment it exists.
    pub(crate) fn new(id: RunId, descriptor: AlgorithmDescriptor) -> Self {
        Self {
            id,
            descriptor,
            rendezvous: Rendezvous::new(),
            state: Mutex::new(RunState::Running),
            checkpoints: AtomicU64::new(0),
            abort_seen: AtomicBool::new(false),
        }
    }

    pub(crate) fn state(&self) -> RunState {
        *self.state.lock()
    }

    pub(crate) fn checkpoints(&self) -> u64 {
        self.checkpoints.load(Ordering::Acquire)
    }

    /// Count a checkpoint entry and return its 1-based index.
    pub(crate) fn enter_checkpoint(&self) -> u64 {
        self.checkpoints.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn abort_seen(&self) -> bool {
        self.abort_seen.load(Ordering::Acquire)
    }

    pub(crate) fn latch_abort(&self) {
        self.abort_seen.store(true, Ordering::Release);
    }

    /// Running -> Killed, then break the rendezvous.
    ///
    /// Returns whether the state changed. The rendezvous is broken either
    /// way, which is harmless once the algorithm has departed.
    pub(crate) fn kill(&self) -> bool {
        let mut state = self.state.lock();
        let changed = *state == RunState::Running;
        if changed {
            *state = RunState::Killed;
        }
        self.rendezvous.abort();
        changed
    }

    /// Record how the algorithm thread ended, then leave the rendezvous.
    ///
    /// The terminal state is written before departing so that a `step`
    /// woken by the departure already observes it.
    fn complete(&self, panicked: bool) {
        {
            let mut state = self.state.lock();
            if *state == RunState::Running {
                if panicked {
                    error!(
                        run = %self.id,
                        algorithm = %self.descriptor.name(),
                        "algorithm thread panicked"
                    );
                    *state = RunState::Killed;
                } else {
                    info!(
                        run = %self.id,
                        algorithm = %self.descriptor.name(),
                        checkpoints = self.checkpoints(),
                        "algorithm finished"
                    );
                    *state = RunState::Finished;
                }
            }
        }
        self.rendezvous.depart();
    }
}

/// Completes the run when the algorithm thread unwinds or returns.
pub(crate) struct ExitGuard<'a>(pub(crate) &'a RunShared);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.0.complete(thread::panicking());
    }
}
