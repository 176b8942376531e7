//! Step Controller
//!
//! The driver-facing half of the engine. A controller launches an
//! algorithm on its own thread and then admits one mutation window per
//! `step`.
//!
//! # How It Works
//!
//! 1. `start` creates a fresh run: a new [`Rendezvous`](crate::sync::Rendezvous),
//!    RunState = Running, and a thread that calls `Algorithm::run`.
//!
//! 2. The algorithm parks at its first checkpoint.
//!
//! 3. `step` arrives at the rendezvous, releasing the algorithm into its
//!    next mutation window, then blocks until the algorithm parks at the
//!    following checkpoint or returns. When `step` returns, every mutation
//!    made in that window is visible to the driver.
//!
//! 4. `kill` breaks the rendezvous. The algorithm sees `true` from its
//!    current or next checkpoint and returns.
//!
//! # Policy on `start` while running
//!
//! Rejected with [`StepError::AlreadyRunning`]. Kill the live run first.
//!
//! A killed run stays live until its thread has left `Algorithm::run`; the
//! algorithm may still be inside a mutation window when `kill` returns.
//! `start` is rejected in that window too, so at most one algorithm thread
//! exists per controller. Call `join` after `kill` to wait it out. Once the
//! previous thread has left, `start` reaps it and discards its state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::checkpoint::Checkpoint;
use super::notify::{EventOrigin, RenderEvent, RenderNotifier, SubscriberId};
use super::run::{ExitGuard, RunShared};
use super::state::{RunId, RunState};
use crate::algorithm::{Algorithm, AlgorithmDescriptor};
use crate::config::ControllerConfig;
use crate::error::{StepError, StepResult};
use crate::graph::{self, GraphModel, GraphView};
use crate::sync::Arrival;

/// Bookkeeping for the most recent run.
struct ActiveRun {
    shared: Arc<RunShared>,
    view: GraphView,
    handle: Option<JoinHandle<()>>,
}

/// Owns the step synchronisation for one algorithm at a time.
///
/// Every method takes `&self`; share the controller behind an `Arc` to
/// issue `kill` from a thread other than the one calling `step`.
pub struct StepController {
    config: ControllerConfig,
    notifier: Arc<RenderNotifier>,
    current: Mutex<Option<ActiveRun>>,
    /// Serialises `step` so only one driver arrival exists per generation.
    step_turn: Mutex<()>,
    runs_started: AtomicU64,
}

impl StepController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            notifier: Arc::new(RenderNotifier::new()),
            current: Mutex::new(None),
            step_turn: Mutex::new(()),
            runs_started: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Launch `algorithm` on `model` and return immediately.
    ///
    /// The returned view is the driver's read-only handle on the graph for
    /// this run.
    pub fn start(
        &self,
        model: GraphModel,
        algorithm: Arc<dyn Algorithm>,
    ) -> StepResult<GraphView> {
        let mut current = self.current.lock();
        if let Some(run) = current.as_mut() {
            let draining = !run.shared.rendezvous.has_departed()
                && run.shared.state() != RunState::Finished;
            if draining {
                warn!(
                    run = %run.shared.id,
                    algorithm = %run.shared.descriptor.name(),
                    state = %run.shared.state(),
                    "start rejected: a run is still live"
                );
                return Err(StepError::AlreadyRunning {
                    algorithm: run.shared.descriptor.name().to_string(),
                    run: run.shared.id,
                });
            }
            // Finished or departed: the thread has left `run`.
            if let Some(handle) = run.handle.take() {
                let _ = handle.join();
            }
        }

        let id = RunId::from(self.runs_started.fetch_add(1, Ordering::Relaxed) + 1);
        let descriptor = algorithm.descriptor().clone();
        let (nodes, edges) = (model.node_count(), model.edge_count());
        let (view, graph) = graph::share(model);
        let shared = Arc::new(RunShared::new(id, descriptor));
        let checkpoint = Checkpoint::new(Arc::clone(&shared), Arc::clone(&self.notifier));

        let mut builder =
            thread::Builder::new().name(format!("{}-{}", self.config.thread_name, id.raw()));
        if let Some(size) = self.config.stack_size {
            builder = builder.stack_size(size);
        }

        let thread_shared = Arc::clone(&shared);
        let handle = builder.spawn(move || {
            let _exit = ExitGuard(&thread_shared);
            algorithm.run(&graph, &checkpoint);
        })?;

        info!(
            run = %id,
            algorithm = %shared.descriptor.name(),
            nodes,
            edges,
            "algorithm started"
        );

        *current = Some(ActiveRun {
            shared,
            view: view.clone(),
            handle: Some(handle),
        });
        Ok(view)
    }

    /// Admit the next mutation window.
    ///
    /// No-op unless the current run is Running. Otherwise blocks until the
    /// algorithm has parked at its next checkpoint, returned, or been
    /// killed, and reports the state at that point.
    pub fn step(&self) -> RunState {
        let _turn = self.step_turn.lock();
        let Some(shared) = self.current_run() else {
            return RunState::Idle;
        };
        if !shared.state().is_running() {
            return shared.state();
        }

        debug!(run = %shared.id, checkpoint = shared.checkpoints(), "step");
        if shared.rendezvous.arrive_and_wait().is_err() {
            return shared.state();
        }
        let arrival = shared.rendezvous.await_arrival();

        let state = shared.state();
        if arrival.is_ok() && state != RunState::Killed && self.config.notify_on_step {
            self.notifier.emit(RenderEvent {
                run: shared.id,
                checkpoint: shared.checkpoints(),
                origin: EventOrigin::Step,
            });
        }
        if arrival == Ok(Arrival::Departed) {
            debug!(run = %shared.id, state = %state, "algorithm left during step");
        }
        state
    }

    /// Cancel the live run. Safe at any time, from any thread; a no-op when
    /// nothing is running.
    pub fn kill(&self) {
        let current = self.current.lock();
        let Some(run) = current.as_ref() else {
            debug!("kill ignored: nothing started");
            return;
        };
        if run.shared.kill() {
            info!(
                run = %run.shared.id,
                algorithm = %run.shared.descriptor.name(),
                checkpoints = run.shared.checkpoints(),
                "algorithm killed"
            );
        }
    }

    /// Whether the current run reached its natural end.
    pub fn is_finished(&self) -> bool {
        self.state() == RunState::Finished
    }

    /// State of the current run, or Idle before the first `start`.
    pub fn state(&self) -> RunState {
        self.current_run()
            .map_or(RunState::Idle, |shared| shared.state())
    }

    /// Wait for the current run's thread to exit and return its final state.
    ///
    /// While the run is Running this only returns once other threads step
    /// it to completion or kill it.
    pub fn join(&self) -> RunState {
        let handle = self.current.lock().as_mut().and_then(|run| run.handle.take());
        if let Some(handle) = handle {
            // A panic has already been recorded as Killed.
            let _ = handle.join();
        }
        self.state()
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.current_run().map(|shared| shared.id)
    }

    pub fn descriptor(&self) -> Option<AlgorithmDescriptor> {
        self.current_run().map(|shared| shared.descriptor.clone())
    }

    /// Read-only handle on the current run's graph.
    pub fn graph(&self) -> Option<GraphView> {
        self.current.lock().as_ref().map(|run| run.view.clone())
    }

    /// Checkpoints the current run has entered.
    pub fn checkpoints_reached(&self) -> u64 {
        self.current_run().map_or(0, |shared| shared.checkpoints())
    }

    /// Register a render callback. See [`RenderNotifier::subscribe`].
    pub fn subscribe<F>(&self, notify: F) -> SubscriberId
    where
        F: Fn(&RenderEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(notify)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Channel receiving every subsequent render event.
    pub fn events(&self) -> mpsc::Receiver<RenderEvent> {
        self.notifier.channel()
    }

    fn current_run(&self) -> Option<Arc<RunShared>> {
        self.current.lock().as_ref().map(|run| Arc::clone(&run.shared))
    }
}

impl Default for StepController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl Drop for StepController {
    fn drop(&mut self) {
        // Never join: a non-conforming algorithm could hold us forever.
        self.kill();
    }
}

impl fmt::Debug for StepController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepController")
            .field("run", &self.run_id())
            .field("state", &self.state())
            .field("checkpoints", &self.checkpoints_reached())
            .field("sinks", &self.notifier.sink_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
