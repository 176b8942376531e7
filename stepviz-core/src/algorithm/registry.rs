//! Catalogue of algorithms a driver can offer.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{Algorithm, AlgorithmDescriptor, Coloring};

/// Insertion-ordered map from algorithm name to implementation.
#[derive(Default, Clone)]
pub struct AlgorithmRegistry {
    algorithms: IndexMap<String, Arc<dyn Algorithm>>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every algorithm shipped with this crate.
    pub fn builtin() -> Self {
        Self::new().with_algorithm(Arc::new(Coloring::new()))
    }

    /// Register an algorithm under its descriptor name, replacing any
    /// previous entry with that name.
    pub fn register(&mut self, algorithm: Arc<dyn Algorithm>) {
        let name = algorithm.descriptor().name().to_string();
        self.algorithms.insert(name, algorithm);
    }

    /// Register an algorithm (builder pattern).
    pub fn with_algorithm(mut self, algorithm: Arc<dyn Algorithm>) -> Self {
        self.register(algorithm);
        self
    }

    /// Get an algorithm by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Algorithm>> {
        self.algorithms.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.algorithms.keys().map(String::as_str).collect()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<&AlgorithmDescriptor> {
        self.algorithms.values().map(|a| a.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.names())
            .finish()
    }
}
