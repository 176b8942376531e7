//! Configuration for the step controller and the spring layout.
//!
//! Both structs deserialize from JSON. Missing fields take their defaults,
//! unknown fields are rejected.

use serde::{Deserialize, Serialize};

use crate::error::StepResult;

/// Configuration for a [`StepController`](crate::engine::StepController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Name given to algorithm threads, suffixed with the run ID.
    pub thread_name: String,

    /// Stack size for algorithm threads. `None` uses the platform default.
    pub stack_size: Option<usize>,

    /// Emit a render notification when `step` returns, in addition to the
    /// one emitted by each checkpoint.
    pub notify_on_step: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            thread_name: "stepviz-algorithm".to_string(),
            stack_size: None,
            notify_on_step: true,
        }
    }
}

impl ControllerConfig {
    /// Only checkpoints notify; `step` stays silent.
    pub fn quiet() -> Self {
        Self {
            notify_on_step: false,
            ..Default::default()
        }
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> StepResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> StepResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parameters of the force-directed [`SpringLayout`](crate::graph::SpringLayout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Number of simulation iterations.
    pub iterations: usize,
    /// Time step per iteration.
    pub dt: f64,
    /// Velocity damping factor (0-1).
    pub damping: f64,
    /// Pairwise repulsion strength.
    pub repulsion: f64,
    /// Edge spring strength.
    pub attraction: f64,
    /// Rest length of edge springs.
    pub ideal_length: f64,
    /// Pull toward the origin.
    pub gravity: f64,
    /// Half-width of the square the result is fitted into.
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            dt: 0.1,
            damping: 0.85,
            repulsion: 0.5,
            attraction: 0.8,
            ideal_length: 1.0,
            gravity: 0.05,
            scale: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Fewer iterations, for large graphs or tests.
    pub fn fast() -> Self {
        Self {
            iterations: 100,
            ..Default::default()
        }
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> StepResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
