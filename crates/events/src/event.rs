// SPDX-License-Identifier: MIT

use clove_core::{AgentId, Value};
use serde::{Deserialize, Serialize};

/// The subscribable event types (§4.10). Kept separate from [`Event`]
/// itself — this is the discriminant agents subscribe by, not the payload
/// envelope, matching the teacher's `Event`/`EventKind` split (DESIGN.md
/// open question #4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AgentSpawned,
    AgentExited,
    AgentPaused,
    AgentResumed,
    AgentRestarting,
    AgentEscalated,
    MessageReceived,
    StateChanged,
    SyscallBlocked,
    ResourceWarning,
    Custom,
}

/// `{type, data, source_agent_id, timestamp}` (§3). `source_agent_id ==
/// AgentId::KERNEL` for kernel-emitted events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub data: Value,
    pub source_agent_id: AgentId,
    pub timestamp_ms: u64,
}

impl Event {
    pub fn new(event_type: EventType, data: Value, source_agent_id: AgentId, timestamp_ms: u64) -> Self {
        Self {
            event_type,
            data,
            source_agent_id,
            timestamp_ms,
        }
    }

    pub fn kernel(event_type: EventType, data: Value, timestamp_ms: u64) -> Self {
        Self::new(event_type, data, AgentId::KERNEL, timestamp_ms)
    }
}
