//! Graph Nodes
//!
//! This module defines the node type that algorithms walk and the driver
//! renders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a node in a [`GraphModel`](super::GraphModel).
///
/// Identifiers are unique within one model, not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 2D position in layout space.
///
/// Layouts place nodes inside a square centred on the origin; mapping that
/// square onto a canvas is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Return this position shifted by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A node in the graph model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within the owning model.
    id: NodeId,

    /// Human-readable label shown by the renderer.
    label: String,

    /// Current position in layout space.
    position: Position,

    /// Display color or tag assigned by an algorithm. `None` means the
    /// renderer's default.
    color: Option<String>,
}

impl Node {
    /// Create an uncolored node at the origin.
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            position: Position::default(),
            color: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Get the current color tag, if any.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Assign a color tag.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = Some(color.into());
    }

    /// Remove the color tag.
    pub fn clear_color(&mut self) {
        self.color = None;
    }

    /// Whether an algorithm has colored this node.
    pub fn is_colored(&self) -> bool {
        self.color.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_uncolored_at_origin() {
        let node = Node::new(NodeId::from(3), "c");
        assert_eq!(node.id(), NodeId::from(3));
        assert_eq!(node.label(), "c");
        assert_eq!(node.position(), Position::default());
        assert!(!node.is_colored());
    }

    #[test]
    fn color_transitions() {
        let mut node = Node::new(NodeId::from(0), "a");

        node.set_color("red");
        assert_eq!(node.color(), Some("red"));

        node.set_color("blue");
        assert_eq!(node.color(), Some("blue"));

        node.clear_color();
        assert_eq!(node.color(), None);
    }

    #[test]
    fn position_helpers() {
        let origin = Position::default();
        let p = Position::new(3.0, 4.0);
        assert_eq!(origin.distance_to(p), 5.0);
        assert_eq!(p.offset(-3.0, 1.0), Position::new(0.0, 5.0));
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::from(7).to_string(), "#7");
        assert_eq!(NodeId::from(7).raw(), 7);
    }
}
