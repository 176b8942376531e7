//! Stepviz Core
//!
//! This crate provides the engine behind an interactive graph algorithm
//! visualizer. An algorithm runs on its own thread and suspends itself at
//! checkpoints; the driver (a UI, a CLI, a test) admits one mutation
//! window at a time with `step` and renders the graph in between.
//!
//! It implements:
//!
//! - A two-party rendezvous with abort, the only synchronisation primitive
//! - The step controller: start, step, kill, and run lifecycle tracking
//! - The checkpoint API algorithms are written against
//! - The graph model, its shared read/write handles, and layouts
//!
//! # Architecture
//!
//! - `sync`: the rendezvous barrier
//! - `engine`: controller, checkpoint, run state, render notifications
//! - `algorithm`: the `Algorithm` trait, the reference coloring pass, a registry
//! - `graph`: nodes, edges, the model, layouts
//! - `config`: controller and layout configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stepviz_core::algorithm::Coloring;
//! use stepviz_core::engine::StepController;
//! use stepviz_core::graph::GraphModel;
//!
//! let controller = StepController::default();
//! let view = controller
//!     .start(GraphModel::complete(4), Arc::new(Coloring::new()))
//!     .unwrap();
//!
//! while !controller.is_finished() {
//!     controller.step();
//!     view.read(|graph| println!("colored: {:?}", graph.colored_nodes()));
//! }
//! ```

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod sync;

pub use algorithm::{Algorithm, AlgorithmDescriptor, AlgorithmRegistry, Coloring, FnAlgorithm};
pub use config::{ControllerConfig, LayoutConfig};
pub use engine::{Checkpoint, RenderEvent, RunId, RunState, StepController};
pub use error::{Aborted, GraphError, StepError, StepResult};
pub use graph::{GraphModel, GraphMut, GraphView, NodeId};
