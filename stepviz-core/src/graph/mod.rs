//! Graph Model
//!
//! The node/edge structure an algorithm walks and mutates, plus the
//! pluggable layouts that give each node a position.
//!
//! # Overview
//!
//! - [`GraphModel`] owns nodes (insertion-ordered, indexed by [`NodeId`])
//!   and undirected edges (indexed by unordered endpoint pair).
//! - [`GraphView`] and [`GraphMut`] are the two halves of a model shared
//!   between the driver and a running algorithm.
//! - [`Layout`] implementations assign positions; they know nothing about
//!   colors or algorithms.

mod edge;
mod layout;
mod model;
mod node;
mod shared;

pub use edge::{Edge, EdgeKey};
pub use layout::{CircularLayout, Layout, SpringLayout};
pub use model::{GraphModel, Neighbors};
pub use node::{Node, NodeId, Position};
pub use shared::{GraphMut, GraphView};

pub(crate) use shared::share;
