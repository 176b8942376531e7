//! Algorithms
//!
//! An algorithm is any unit of work that walks and mutates a
//! [`GraphModel`](crate::graph::GraphModel) while yielding to the driver
//! through a [`Checkpoint`].
//!
//! # Authoring Contract
//!
//! - Call `checkpoint.pause()` at least once before making any mutation
//!   visible, and at least once between logically distinct steps.
//! - Check the returned flag after every call; on `true`, return at once.
//! - Return normally at the natural end. The engine then marks the run
//!   Finished.
//! - Never hold graph access across a `pause`.

mod coloring;
mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Checkpoint;
use crate::graph::GraphMut;

pub use coloring::{Coloring, DEFAULT_COLOR};
pub use registry::AlgorithmRegistry;

/// Display metadata attached to an algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    name: String,
    description: String,
}

impl AlgorithmDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// A steppable graph algorithm.
pub trait Algorithm: Send + Sync {
    fn descriptor(&self) -> &AlgorithmDescriptor;

    /// Run to completion on the algorithm thread, pausing at checkpoints.
    fn run(&self, graph: &GraphMut, checkpoint: &Checkpoint);
}

/// An [`Algorithm`] backed by a closure.
pub struct FnAlgorithm {
    descriptor: AlgorithmDescriptor,
    run: Box<dyn Fn(&GraphMut, &Checkpoint) + Send + Sync>,
}

impl FnAlgorithm {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, run: F) -> Self
    where
        F: Fn(&GraphMut, &Checkpoint) + Send + Sync + 'static,
    {
        Self {
            descriptor: AlgorithmDescriptor::new(name, description),
            run: Box::new(run),
        }
    }
}

impl Algorithm for FnAlgorithm {
    fn descriptor(&self) -> &AlgorithmDescriptor {
        &self.descriptor
    }

    fn run(&self, graph: &GraphMut, checkpoint: &Checkpoint) {
        (self.run)(graph, checkpoint);
    }
}

impl fmt::Debug for FnAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAlgorithm")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
