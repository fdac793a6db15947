//! Worker lifecycle tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle states of a cache worker.
///
/// A worker moves strictly forward: `Installing` → `Installed` → `Activated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Registered, precache not yet populated.
    #[default]
    Installing,
    /// Precache populated, waiting to take over.
    Installed,
    /// Controlling clients and intercepting fetches.
    Activated,
}

impl WorkerState {
    /// The state reached after a successful transition, if any.
    pub fn next(&self) -> Option<WorkerState> {
        match self {
            Self::Installing => Some(Self::Installed),
            Self::Installed => Some(Self::Activated),
            Self::Activated => None,
        }
    }

    /// Check whether fetch events are intercepted in this state.
    pub fn intercepts_fetches(&self) -> bool {
        matches!(self, Self::Activated)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installing => write!(f, "installing"),
            Self::Installed => write!(f, "installed"),
            Self::Activated => write!(f, "activated"),
        }
    }
}
