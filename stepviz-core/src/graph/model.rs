//! Graph Model
//!
//! The mutable node/edge structure that algorithms read and write and the
//! driver renders.
//!
//! # Invariants
//!
//! - Every edge joins two distinct nodes that are present in the model.
//! - Iteration order over nodes and edges is insertion order, so an
//!   algorithm that walks `nodes()` behaves the same on every run.
//!
//! The model does no synchronisation of its own. Cross-thread access goes
//! through [`GraphView`](super::GraphView) and [`GraphMut`](super::GraphMut).

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::edge::{Edge, EdgeKey};
use super::layout::{Layout, SpringLayout};
use super::node::{Node, NodeId};
use crate::error::GraphError;

/// Neighbor list returned by [`GraphModel::neighbors`].
pub type Neighbors = SmallVec<[NodeId; 8]>;

/// Undirected graph with insertion-ordered nodes and edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphModel {
    /// All nodes, indexed by ID.
    nodes: IndexMap<NodeId, Node>,

    /// All edges, indexed by their unordered endpoint pair.
    edges: IndexMap<EdgeKey, Edge>,

    /// Next ID handed out by `add_node`.
    next_id: u64,
}

impl GraphModel {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete graph on `n` nodes labelled `0..n`, positioned by the
    /// default spring layout.
    pub fn complete(n: usize) -> Self {
        Self::complete_with_layout(n, &SpringLayout::default())
    }

    /// Complete graph on `n` nodes positioned by `layout`.
    pub fn complete_with_layout(n: usize, layout: &dyn Layout) -> Self {
        let mut model = Self::new();
        let ids: Vec<NodeId> = (0..n).map(|i| model.add_node(i.to_string())).collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                model.edges.insert(EdgeKey::new(a, b), Edge::new(a, b));
            }
        }
        model.relayout(layout);
        model
    }

    /// Add a node with a fresh ID.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = self.fresh_id();
        self.nodes.insert(id, Node::new(id, label));
        id
    }

    /// Insert a node that carries its own ID.
    ///
    /// `u64::MAX` is reserved and rejected.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id();
        let Some(successor) = id.raw().checked_add(1) else {
            return Err(GraphError::ReservedId { node_id: id });
        };
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode { node_id: id });
        }
        self.next_id = self.next_id.max(successor);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Next unused ID. Falls back to the lowest free ID once the counter
    /// reaches the reserved maximum.
    fn fresh_id(&mut self) -> NodeId {
        if let Some(successor) = self.next_id.checked_add(1) {
            let id = NodeId::from(self.next_id);
            self.next_id = successor;
            return id;
        }
        (0..u64::MAX)
            .map(NodeId::from)
            .find(|id| !self.nodes.contains_key(id))
            .unwrap_or(NodeId::from(u64::MAX))
    }

    /// Remove a node from the graph.
    ///
    /// Also removes all edges involving this node.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;
        self.edges.retain(|key, _| !key.touches(node_id));
        Some(node)
    }

    /// Get a reference to a node.
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable reference to a node.
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Find the first node with the given label.
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.values().find(|node| node.label() == label)
    }

    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node IDs in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Add an unweighted edge between two existing, distinct nodes.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeKey, GraphError> {
        self.insert_edge(Edge::new(a, b))
    }

    /// Add a weighted edge between two existing, distinct nodes.
    pub fn add_weighted_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: f64,
    ) -> Result<EdgeKey, GraphError> {
        self.insert_edge(Edge::weighted(a, b, weight))
    }

    fn insert_edge(&mut self, edge: Edge) -> Result<EdgeKey, GraphError> {
        let (a, b) = (edge.source(), edge.target());
        if a == b {
            return Err(GraphError::SelfLoop { node_id: a });
        }
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::NodeNotFound { node_id: id });
            }
        }
        let key = edge.key();
        if self.edges.contains_key(&key) {
            return Err(GraphError::DuplicateEdge { a, b });
        }
        self.edges.insert(key, edge);
        Ok(key)
    }

    /// Remove the edge between `a` and `b`, in either order.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<Edge> {
        self.edges.shift_remove(&EdgeKey::new(a, b))
    }

    /// Look up the edge between `a` and `b`, in either order.
    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Nodes adjacent to `node_id`, in edge insertion order.
    pub fn neighbors(&self, node_id: NodeId) -> Neighbors {
        self.edges
            .keys()
            .filter_map(|key| key.other(node_id))
            .collect()
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Assign a color tag to a node.
    pub fn set_color(
        &mut self,
        node_id: NodeId,
        color: impl Into<String>,
    ) -> Result<(), GraphError> {
        self.nodes
            .get_mut(&node_id)
            .map(|node| node.set_color(color))
            .ok_or(GraphError::NodeNotFound { node_id })
    }

    /// Remove every color tag.
    pub fn clear_colors(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_color();
        }
    }

    /// IDs of colored nodes, in insertion order.
    pub fn colored_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.is_colored())
            .map(Node::id)
            .collect()
    }

    /// Assign fresh positions to every node.
    pub fn relayout(&mut self, layout: &dyn Layout) {
        let ids = self.node_ids();
        let pairs: Vec<(NodeId, NodeId)> = self.edges.keys().map(EdgeKey::endpoints).collect();
        let positions = layout.positions(&ids, &pairs);
        for (id, position) in positions {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.set_position(position);
            }
        }
    }

    /// Shift every node by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for node in self.nodes.values_mut() {
            node.set_position(node.position().offset(dx, dy));
        }
    }
}
