//! Integration Tests for the Stepping Engine
//!
//! These tests drive a `StepController` the way a UI would and verify the
//! lifecycle, cancellation and visibility guarantees end to end.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use stepviz_core::engine::{EventOrigin, SubscriberId};
use stepviz_core::graph::GraphMut;
use stepviz_core::{
    Algorithm, Checkpoint, Coloring, FnAlgorithm, GraphModel, NodeId, RunState, StepController,
    StepError,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn three_nodes() -> (GraphModel, Vec<NodeId>) {
    let mut model = GraphModel::new();
    let ids = ["A", "B", "C"].into_iter().map(|l| model.add_node(l)).collect();
    (model, ids)
}

/// Passes exactly `k` checkpoints, coloring one node after each.
fn k_checkpoints(k: usize) -> Arc<dyn Algorithm> {
    Arc::new(FnAlgorithm::new(
        "k",
        "k checkpoints",
        move |graph: &GraphMut, checkpoint: &Checkpoint| {
            for i in 0..k {
                if checkpoint.pause() {
                    return;
                }
                graph.update(|g| g.add_node(format!("step-{i}")));
            }
        },
    ))
}

/// Run `f` on a helper thread and fail if it does not return in time.
fn within_timeout<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(TIMEOUT).expect("operation did not complete in time")
}

/// K steps over an algorithm with K checkpoints leave the run finished.
#[test]
fn k_steps_finish_an_algorithm_with_k_checkpoints() {
    for k in 0..6 {
        let controller = StepController::default();
        let view = controller.start(GraphModel::new(), k_checkpoints(k)).unwrap();

        for i in 0..k {
            assert!(!controller.is_finished(), "k={k} finished early at step {i}");
            controller.step();
        }
        controller.join();
        assert!(controller.is_finished(), "k={k}");
        assert_eq!(view.read(GraphModel::node_count), k);
    }
}

/// The three-node coloring walk from start to finish.
#[test]
fn coloring_three_nodes_step_by_step() {
    let (model, ids) = three_nodes();
    let controller = StepController::default();
    let view = controller.start(model, Arc::new(Coloring::new())).unwrap();

    assert_eq!(controller.step(), RunState::Running);
    assert!(view.read(GraphModel::colored_nodes).is_empty());

    assert_eq!(controller.step(), RunState::Running);
    assert_eq!(view.read(GraphModel::colored_nodes), ids[..1]);

    assert_eq!(controller.step(), RunState::Running);
    assert_eq!(view.read(GraphModel::colored_nodes), ids[..2]);

    assert_eq!(controller.step(), RunState::Finished);
    assert!(controller.is_finished());
    assert_eq!(view.read(GraphModel::colored_nodes), ids);
    assert_eq!(controller.checkpoints_reached(), 4);
}

/// Killing before the first step aborts the first checkpoint with no mutation.
#[test]
fn kill_before_first_step_performs_no_mutation() {
    let (model, _) = three_nodes();
    let controller = StepController::default();
    let view = controller.start(model, Arc::new(Coloring::new())).unwrap();

    controller.kill();
    assert_eq!(controller.join(), RunState::Killed);
    assert!(!controller.is_finished());
    assert!(view.read(GraphModel::colored_nodes).is_empty());
    assert_eq!(controller.step(), RunState::Killed);
}

/// After the abort is observed, the algorithm never touches the graph again.
#[test]
fn no_mutation_after_abort_is_observed() {
    let mutated_after_abort = Arc::new(AtomicBool::new(false));
    let flag = mutated_after_abort.clone();
    let algorithm = Arc::new(FnAlgorithm::new(
        "stubborn-check",
        "records any write after abort",
        move |graph: &GraphMut, checkpoint: &Checkpoint| {
            for i in 0.. {
                let aborted = checkpoint.pause();
                if checkpoint.is_aborted() && !aborted {
                    flag.store(true, Ordering::SeqCst);
                }
                if aborted {
                    return;
                }
                graph.update(|g| g.add_node(format!("n{i}")));
            }
        },
    ));

    let controller = StepController::default();
    let view = controller.start(GraphModel::new(), algorithm).unwrap();
    controller.step();
    controller.step();
    let before = view.snapshot();

    controller.kill();
    assert_eq!(controller.join(), RunState::Killed);

    assert_eq!(view.snapshot(), before);
    assert_eq!(before.node_count(), 2);
    assert!(!mutated_after_abort.load(Ordering::SeqCst));
}

/// `kill` on an idle controller is a no-op and does not fail.
#[test]
fn kill_before_start_is_a_no_op() {
    let controller = StepController::default();
    controller.kill();
    assert_eq!(controller.state(), RunState::Idle);

    controller.start(GraphModel::new(), k_checkpoints(1)).unwrap();
    assert_eq!(controller.state(), RunState::Running);
    assert_eq!(controller.step(), RunState::Finished);
}

/// Killing twice is observably the same as killing once.
#[test]
fn double_kill_is_idempotent() {
    let controller = StepController::default();
    let view = controller.start(GraphModel::new(), k_checkpoints(5)).unwrap();
    controller.step();

    controller.kill();
    let state_once = controller.state();
    controller.kill();
    assert_eq!(controller.state(), state_once);
    assert_eq!(controller.join(), RunState::Killed);
    assert_eq!(view.read(GraphModel::node_count), 1);

    // Killing a finished run changes nothing either.
    controller.start(GraphModel::new(), k_checkpoints(0)).unwrap();
    assert_eq!(controller.join(), RunState::Finished);
    controller.kill();
    assert!(controller.is_finished());
}

/// Every step returns in bounded time for a conforming algorithm.
#[test]
fn steps_never_deadlock() {
    let controller = Arc::new(StepController::default());
    controller.start(GraphModel::new(), k_checkpoints(200)).unwrap();

    let driver = Arc::clone(&controller);
    let last = within_timeout(move || {
        let mut state = RunState::Running;
        for _ in 0..200 {
            state = driver.step();
        }
        state
    });
    assert_eq!(last, RunState::Finished);
}

/// `step` waits for the whole mutation window, however slow it is.
#[test]
fn step_returns_only_after_the_window_is_applied() {
    let algorithm = Arc::new(FnAlgorithm::new(
        "slow",
        "sleeps mid-window",
        |graph: &GraphMut, checkpoint: &Checkpoint| {
            if checkpoint.pause() {
                return;
            }
            graph.update(|g| g.add_node("first"));
            thread::sleep(Duration::from_millis(50));
            graph.update(|g| g.add_node("second"));
            checkpoint.pause();
        },
    ));

    let controller = StepController::default();
    let view = controller.start(GraphModel::new(), algorithm).unwrap();

    assert_eq!(controller.step(), RunState::Running);
    assert_eq!(view.read(GraphModel::node_count), 2);
    assert_eq!(controller.step(), RunState::Finished);
}

/// A kill issued mid-window is latched and delivered at the next checkpoint.
#[test]
fn kill_during_a_mutation_window_is_latched() {
    let in_window = Arc::new(AtomicBool::new(false));
    let release = Arc::new(AtomicBool::new(false));
    let (in_window_alg, release_alg) = (in_window.clone(), release.clone());
    let windows = Arc::new(AtomicUsize::new(0));
    let windows_alg = windows.clone();

    let algorithm = Arc::new(FnAlgorithm::new(
        "busy",
        "spins inside a window",
        move |graph: &GraphMut, checkpoint: &Checkpoint| {
            while !checkpoint.pause() {
                windows_alg.fetch_add(1, Ordering::SeqCst);
                in_window_alg.store(true, Ordering::SeqCst);
                while !release_alg.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(1));
                }
                graph.update(|g| g.add_node("late"));
            }
        },
    ));

    let controller = Arc::new(StepController::default());
    let view = controller.start(GraphModel::new(), algorithm).unwrap();

    let driver = Arc::clone(&controller);
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(driver.step());
    });

    while !in_window.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }
    controller.kill();
    release.store(true, Ordering::SeqCst);

    assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), RunState::Killed);
    assert_eq!(controller.join(), RunState::Killed);
    assert_eq!(windows.load(Ordering::SeqCst), 1);
    // The in-flight window completes; nothing follows it.
    assert_eq!(view.read(GraphModel::node_count), 1);
}

/// A killed run that is still inside a window blocks a new `start` until it
/// has drained.
#[test]
fn restart_waits_for_a_draining_run() {
    let alive = Arc::new(AtomicUsize::new(0));
    let overlap = Arc::new(AtomicBool::new(false));
    let in_window = Arc::new(AtomicBool::new(false));

    let make = || -> Arc<dyn Algorithm> {
        let (alive, overlap, in_window) = (alive.clone(), overlap.clone(), in_window.clone());
        Arc::new(FnAlgorithm::new(
            "slow-window",
            "sleeps inside its first window",
            move |_: &GraphMut, checkpoint: &Checkpoint| {
                if alive.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlap.store(true, Ordering::SeqCst);
                }
                if !checkpoint.pause() {
                    in_window.store(true, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(200));
                    checkpoint.pause();
                }
                alive.fetch_sub(1, Ordering::SeqCst);
            },
        ))
    };

    let controller = Arc::new(StepController::default());
    controller.start(GraphModel::new(), make()).unwrap();
    let driver = Arc::clone(&controller);
    thread::spawn(move || driver.step());
    while !in_window.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }

    controller.kill();
    assert!(matches!(
        controller.start(GraphModel::new(), make()),
        Err(StepError::AlreadyRunning { .. })
    ));

    assert_eq!(controller.join(), RunState::Killed);
    controller.start(GraphModel::new(), make()).unwrap();
    assert_eq!(controller.state(), RunState::Running);
    controller.kill();
    assert_eq!(controller.join(), RunState::Killed);
    assert!(!overlap.load(Ordering::SeqCst));
}

/// Render notifications come from checkpoints and from steps.
#[test]
fn render_notifications_follow_the_run() {
    let (model, _) = three_nodes();
    let controller = StepController::default();
    let events = controller.events();
    let callbacks = Arc::new(AtomicUsize::new(0));
    let counter = callbacks.clone();
    controller.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    controller.start(model, Arc::new(Coloring::new())).unwrap();
    while controller.step() == RunState::Running {}

    let received: Vec<_> = events.try_iter().collect();
    let checkpoints = received.iter().filter(|e| e.origin == EventOrigin::Checkpoint).count();
    let steps = received.iter().filter(|e| e.origin == EventOrigin::Step).count();
    assert_eq!(checkpoints, 4);
    assert_eq!(steps, 4);
    assert_eq!(callbacks.load(Ordering::SeqCst), received.len());
    assert!(received.iter().all(|e| Some(e.run) == controller.run_id()));
}

/// A one-shot callback may unsubscribe itself from the algorithm thread.
#[test]
fn callback_unsubscribing_itself_does_not_stall_the_run() {
    let controller = Arc::new(StepController::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let own_id: Arc<Mutex<Option<SubscriberId>>> = Arc::new(Mutex::new(None));

    let id = {
        let handle = Arc::downgrade(&controller);
        let (calls, own_id) = (calls.clone(), own_id.clone());
        controller.subscribe(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            let id = own_id.lock().ok().and_then(|id| *id);
            if let (Some(controller), Some(id)) = (handle.upgrade(), id) {
                controller.unsubscribe(id);
            }
        })
    };
    *own_id.lock().unwrap() = Some(id);

    let mut model = GraphModel::new();
    model.add_node("only");
    controller.start(model, Arc::new(Coloring::new())).unwrap();

    let driver = Arc::clone(&controller);
    let states = within_timeout(move || (driver.step(), driver.step()));
    assert_eq!(states, (RunState::Running, RunState::Finished));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!controller.unsubscribe(id));
}

/// A killed run stops producing notifications.
#[test]
fn killed_run_goes_quiet() {
    let controller = StepController::default();
    let events = controller.events();
    controller.start(GraphModel::new(), k_checkpoints(10)).unwrap();
    controller.step();
    controller.kill();
    controller.join();

    let _ = events.try_iter().count();
    assert_eq!(controller.step(), RunState::Killed);
    assert!(events.try_recv().is_err());
}

/// `kill` can come from another thread while the driver is blocked in `step`.
#[test]
fn kill_unblocks_a_waiting_step() {
    let algorithm = Arc::new(FnAlgorithm::new(
        "stall",
        "never checkpoints again",
        |_: &GraphMut, checkpoint: &Checkpoint| {
            if checkpoint.pause() {
                return;
            }
            thread::sleep(Duration::from_millis(100));
            checkpoint.pause();
        },
    ));

    let controller = Arc::new(StepController::default());
    controller.start(GraphModel::new(), algorithm).unwrap();

    let killer = Arc::clone(&controller);
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        killer.kill();
    });

    let driver = Arc::clone(&controller);
    assert_eq!(within_timeout(move || driver.step()), RunState::Killed);
}
