//! Error types for the stepping engine and the graph model.

use thiserror::Error;

use crate::engine::RunId;
use crate::graph::NodeId;

/// Result type alias for controller operations.
pub type StepResult<T> = Result<T, StepError>;

/// Errors surfaced by the driver API.
#[derive(Debug, Error)]
pub enum StepError {
    /// `start` was called while a run is still live.
    #[error("algorithm {algorithm:?} is already running as {run}")]
    AlreadyRunning { algorithm: String, run: RunId },

    /// The operating system refused to spawn the algorithm thread.
    #[error("failed to spawn algorithm thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A graph operation violated the model's invariants.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised by [`GraphModel`](crate::graph::GraphModel) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node referenced by ID is not in the model.
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: NodeId },

    /// A node with this ID already exists.
    #[error("duplicate node: {node_id}")]
    DuplicateNode { node_id: NodeId },

    /// Edges must join two distinct nodes.
    #[error("self-loop on node {node_id} is not allowed")]
    SelfLoop { node_id: NodeId },

    /// The ID leaves no successor for `add_node` to hand out.
    #[error("node id {node_id} is reserved")]
    ReservedId { node_id: NodeId },

    /// An edge between this pair already exists.
    #[error("edge {a} -- {b} already exists")]
    DuplicateEdge { a: NodeId, b: NodeId },
}

/// Returned by [`Rendezvous::arrive_and_wait`](crate::sync::Rendezvous::arrive_and_wait)
/// once the barrier has been broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rendezvous aborted")]
pub struct Aborted;
