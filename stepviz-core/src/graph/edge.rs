//! Graph Edges
//!
//! Edges are undirected. An [`EdgeKey`] normalises the endpoint order so
//! that `(a, b)` and `(b, a)` look up the same edge.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Unordered pair of node IDs, stored smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Both endpoints, smallest first.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }

    /// Whether `node` is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.0 == node || self.1 == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.0 == node {
            Some(self.1)
        } else if self.1 == node {
            Some(self.0)
        } else {
            None
        }
    }
}

/// An undirected edge with an optional weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Endpoints as given at insertion.
    source: NodeId,
    target: NodeId,
    weight: Option<f64>,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            weight: None,
        }
    }

    pub fn weighted(source: NodeId, target: NodeId, weight: f64) -> Self {
        Self {
            source,
            target,
            weight: Some(weight),
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target)
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }
}
