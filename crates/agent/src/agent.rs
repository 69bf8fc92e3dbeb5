// SPDX-License-Identifier: MIT

use clove_core::AgentId;

use crate::process::ProcessHandle;
use crate::restart::RestartState;
use crate::spec::SpawnSpec;
use crate::state::AgentState;

/// A kernel-managed agent. Owned exclusively by [`crate::manager::AgentManager`];
/// every other subsystem holds only its [`AgentId`] (§3 Ownership).
pub struct Agent<H: ProcessHandle> {
    pub id: AgentId,
    pub name: Option<String>,
    pub state: AgentState,
    pub parent_id: AgentId,
    pub children: Vec<AgentId>,
    pub created_at_ms: u64,
    pub handle: Option<H>,
    pub saved_spec: Option<SpawnSpec>,
    pub restart_state: Option<RestartState>,
}

impl<H: ProcessHandle> Agent<H> {
    pub fn os_pid(&self) -> Option<u32> {
        self.handle.as_ref().map(|h| h.os_pid())
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            name: self.name.clone(),
            pid: self.os_pid(),
            state: self.state,
            running: self.state == AgentState::Running,
        }
    }
}

/// Snapshot row returned by `LIST` (§4.5).
#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub name: Option<String>,
    pub pid: Option<u32>,
    pub state: AgentState,
    pub running: bool,
}
