// SPDX-License-Identifier: MIT

use clove_core::{AgentId, Value};
use serde::Serialize;

/// `{from_id, from_name, body, enqueue_time}` (§3). No persistence — lost on
/// kernel exit along with the mailbox it sits in.
#[derive(Debug, Clone)]
pub struct Message {
    pub from_id: AgentId,
    pub from_name: Option<String>,
    pub body: Value,
    pub enqueue_time_ms: u64,
}

/// A message as returned by `RECV`, with its age at dequeue time computed
/// relative to the caller's current clock reading.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedMessage {
    pub from_id: AgentId,
    pub from_name: Option<String>,
    pub body: Value,
    pub age_ms: u64,
}

impl Message {
    pub fn into_received(self, now_ms: u64) -> ReceivedMessage {
        ReceivedMessage {
            from_id: self.from_id,
            from_name: self.from_name,
            body: self.body,
            age_ms: now_ms.saturating_sub(self.enqueue_time_ms),
        }
    }
}
