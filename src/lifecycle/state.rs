//! Worker lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the worker process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Constructed, nothing run yet
    Parsed,
    Installing,
    /// Core partition populated
    Installed,
    Activating,
    /// Stale partitions evicted, clients claimed
    Activated,
    /// Install failed; this version will never activate
    Redundant,
}

impl WorkerState {
    /// Whether an install may start from this state
    pub fn can_install(&self) -> bool {
        matches!(self, Self::Parsed | Self::Installed | Self::Activated)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed => write!(f, "parsed"),
            Self::Installing => write!(f, "installing"),
            Self::Installed => write!(f, "installed"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Redundant => write!(f, "redundant"),
        }
    }
}
