//! Shared Graph Handles
//!
//! A run's [`GraphModel`] is shared between the algorithm thread and the
//! driver thread, but the two sides get different capabilities:
//!
//! - [`GraphView`] (driver): read-only access for rendering.
//! - [`GraphMut`] (algorithm): read and write access.
//!
//! Access is closure-scoped so no guard can be carried across a
//! checkpoint. The lock underneath is uncontended as long as both sides
//! alternate through the run's rendezvous; it turns a misbehaving
//! algorithm into a stall rather than a data race.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::GraphModel;

/// Split a model into its driver-side and algorithm-side handles.
pub(crate) fn share(model: GraphModel) -> (GraphView, GraphMut) {
    let inner = Arc::new(RwLock::new(model));
    (
        GraphView {
            inner: Arc::clone(&inner),
        },
        GraphMut { inner },
    )
}

/// Read-only handle held by the driver.
#[derive(Clone)]
pub struct GraphView {
    inner: Arc<RwLock<GraphModel>>,
}

impl GraphView {
    /// Run `f` against the current graph.
    ///
    /// Call this only between steps; during a mutation window it waits for
    /// the algorithm to finish its write.
    pub fn read<R>(&self, f: impl FnOnce(&GraphModel) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Clone the current graph.
    pub fn snapshot(&self) -> GraphModel {
        self.inner.read().clone()
    }
}

impl fmt::Debug for GraphView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.inner.read();
        f.debug_struct("GraphView")
            .field("nodes", &graph.node_count())
            .field("edges", &graph.edge_count())
            .finish()
    }
}

/// Read-write handle given to the algorithm.
pub struct GraphMut {
    inner: Arc<RwLock<GraphModel>>,
}

impl GraphMut {
    /// Run `f` against the current graph.
    pub fn read<R>(&self, f: impl FnOnce(&GraphModel) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Mutate the graph.
    pub fn update<R>(&self, f: impl FnOnce(&mut GraphModel) -> R) -> R {
        f(&mut *self.inner.write())
    }
}

impl fmt::Debug for GraphMut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphMut").finish_non_exhaustive()
    }
}
