// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Agent lifecycle state (§3): `Created -> Starting -> Running <-> Paused ->
/// Stopping -> Stopped`, with `Failed` reachable from any pre-`Running`
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Created,
    Starting,
    Running,
    Paused,
    Stopping,
    Stopped,
    Failed,
}

impl AgentState {
    pub fn can_pause(self) -> bool {
        self == AgentState::Running
    }

    pub fn can_resume(self) -> bool {
        self == AgentState::Paused
    }

    /// Stop is valid from Running, Starting, or Paused (§3).
    pub fn can_stop(self) -> bool {
        matches!(self, AgentState::Running | AgentState::Starting | AgentState::Paused)
    }

    pub fn is_live(self) -> bool {
        !matches!(self, AgentState::Stopped | AgentState::Failed)
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentState::Created => "created",
            AgentState::Starting => "starting",
            AgentState::Running => "running",
            AgentState::Paused => "paused",
            AgentState::Stopping => "stopping",
            AgentState::Stopped => "stopped",
            AgentState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
