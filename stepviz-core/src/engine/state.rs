//! Run lifecycle types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of one algorithm execution.
///
/// ```text
/// Idle --start--> Running --(algorithm returns)--> Finished
///                 Running --kill--> Killed
/// Finished / Killed --start--> Running (fresh run)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// Nothing has been started yet.
    Idle,

    /// An algorithm thread is live.
    Running,

    /// The algorithm returned normally.
    Finished,

    /// The run was cancelled by `kill` (or its thread panicked).
    Killed,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        *self == RunState::Running
    }

    /// Finished and Killed are terminal until the next `start`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Finished | RunState::Killed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Finished => "finished",
            RunState::Killed => "killed",
        };
        f.write_str(name)
    }
}

/// Identifier of one run, unique within its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RunId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}
