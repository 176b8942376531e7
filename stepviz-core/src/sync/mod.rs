//! Synchronisation Primitives
//!
//! The stepping engine needs exactly one primitive: a two-party rendezvous
//! that the driver and the algorithm thread take turns passing through.
//! Each [`StepController`](crate::engine::StepController) owns its own
//! instance, recreated on every run; there is no process-wide barrier.

mod rendezvous;

pub use rendezvous::{Arrival, Rendezvous, PARTIES};
