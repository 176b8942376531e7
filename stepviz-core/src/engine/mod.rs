//! Stepping Engine
//!
//! This module implements the step synchronisation between a driver
//! thread (which renders) and an algorithm thread (which mutates the
//! graph).
//!
//! # Concepts
//!
//! ## StepController
//!
//! Owns the lifecycle of one run at a time: `start`, `step`, `kill`,
//! `is_finished`. It is the whole external surface the driver needs.
//!
//! ## Checkpoint
//!
//! Handed to the algorithm. Each `pause` suspends the algorithm until the
//! driver steps and tells it whether to abort.
//!
//! ## Render notifications
//!
//! Fire-and-forget events telling the display side that the graph may
//! have changed.
//!
//! # Turn Discipline
//!
//! The graph is mutated only by the algorithm, between checkpoints, and
//! read by the driver only between steps. The rendezvous inside each run
//! enforces the alternation and acts as the memory fence between the two
//! sides.

mod checkpoint;
mod controller;
mod notify;
mod run;
mod state;

pub use checkpoint::Checkpoint;
pub use controller::StepController;
pub use notify::{EventOrigin, RenderEvent, RenderNotifier, SubscriberId};
pub use state::{RunId, RunState};
