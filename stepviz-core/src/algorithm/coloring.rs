//! Coloring
//!
//! The reference algorithm: colors every node, one per step, in insertion
//! order.
//!
//! It passes one checkpoint before the loop, so the untouched graph is
//! shown first, and then one checkpoint ahead of each node. On a graph
//! with N nodes that is N + 1 checkpoints, and the k-th `step` leaves the
//! first k - 1 nodes colored.

use tracing::debug;

use super::{Algorithm, AlgorithmDescriptor};
use crate::engine::Checkpoint;
use crate::graph::{GraphModel, GraphMut};

/// Color applied when none is configured.
pub const DEFAULT_COLOR: &str = "red";

#[derive(Debug, Clone)]
pub struct Coloring {
    descriptor: AlgorithmDescriptor,
    color: String,
}

impl Coloring {
    pub fn new() -> Self {
        Self::with_color(DEFAULT_COLOR)
    }

    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            descriptor: AlgorithmDescriptor::new("Coloring", "Colors every node one at a time"),
            color: color.into(),
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

impl Default for Coloring {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for Coloring {
    fn descriptor(&self) -> &AlgorithmDescriptor {
        &self.descriptor
    }

    fn run(&self, graph: &GraphMut, checkpoint: &Checkpoint) {
        if checkpoint.pause() {
            return;
        }
        for id in graph.read(GraphModel::node_ids) {
            if checkpoint.pause() {
                return;
            }
            graph.update(|g| {
                if let Some(node) = g.node_mut(id) {
                    node.set_color(self.color.as_str());
                }
            });
            debug!(
                run = %checkpoint.run_id(),
                node = %id,
                color = %self.color,
                "colored node"
            );
        }
    }
}
