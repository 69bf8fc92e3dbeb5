// SPDX-License-Identifier: MIT

use std::collections::{HashMap, VecDeque};

use clove_core::{AgentId, Value};

use crate::error::IpcError;
use crate::message::{Message, ReceivedMessage};
use crate::registry::NameRegistry;
use crate::IpcEvent;

/// Default per-agent mailbox bound (§5 Backpressure): "Mailboxes are bounded
/// (default 1 024 messages per agent), oldest-drop with a `ResourceWarning`
/// event."
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1_024;

/// `ResourceWarning` on oldest-drop is "debounced to at most one per second"
/// per §4.10/§5, per affected subscriber.
const OVERFLOW_WARNING_DEBOUNCE_MS: u64 = 1_000;

/// Every live agent's mailbox plus the name registry `SEND`/`RECV` resolve
/// targets through. Owned by the kernel; other subsystems never see this
/// directly (§3 Ownership).
#[derive(Debug)]
pub struct MailboxTable {
    capacity: usize,
    boxes: HashMap<AgentId, VecDeque<Message>>,
    registry: NameRegistry,
    last_overflow_warning_ms: HashMap<AgentId, u64>,
}

impl MailboxTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAILBOX_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            boxes: HashMap::new(),
            registry: NameRegistry::new(),
            last_overflow_warning_ms: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    pub fn register(&mut self, id: AgentId, name: String) -> Result<(), IpcError> {
        self.registry.register(id, name)
    }

    /// Drop an agent's mailbox and registry binding, e.g. on disconnect.
    pub fn remove_agent(&mut self, id: AgentId) {
        self.boxes.remove(&id);
        self.registry.remove(id);
        self.last_overflow_warning_ms.remove(&id);
    }

    /// Resolve a `SEND` target: `to` wins if present, else `to_name` is
    /// looked up in the registry.
    pub fn resolve_target(
        &self,
        to: Option<AgentId>,
        to_name: Option<&str>,
    ) -> Result<AgentId, IpcError> {
        if let Some(id) = to {
            return Ok(id);
        }
        if let Some(name) = to_name {
            return self.registry.resolve(name).ok_or(IpcError::UnknownRecipient);
        }
        Err(IpcError::MissingTarget)
    }

    /// Enqueue `body` into `to`'s mailbox, attributing it to `from_id`
    /// (and its registered name, if any). Returns the overflow event if the
    /// mailbox was already at capacity.
    pub fn send(
        &mut self,
        from_id: AgentId,
        to: AgentId,
        body: Value,
        now_ms: u64,
    ) -> Option<IpcEvent> {
        let from_name = self.registry.name_of(from_id).map(str::to_string);
        let message = Message {
            from_id,
            from_name,
            body,
            enqueue_time_ms: now_ms,
        };
        let queue = self.boxes.entry(to).or_default();
        let overflowed = queue.len() >= self.capacity;
        if overflowed {
            queue.pop_front();
        }
        queue.push_back(message);
        if overflowed {
            if self.overflow_warning_due(to, now_ms) {
                Some(IpcEvent::MailboxOverflow { to })
            } else {
                None
            }
        } else {
            Some(IpcEvent::MessageReceived { to })
        }
    }

    /// Debounce `ResourceWarning` emission on oldest-drop to at most one per
    /// second per subscriber (§4.10/§5).
    fn overflow_warning_due(&mut self, to: AgentId, now_ms: u64) -> bool {
        let due = self
            .last_overflow_warning_ms
            .get(&to)
            .map(|&last| now_ms.saturating_sub(last) >= OVERFLOW_WARNING_DEBOUNCE_MS)
            .unwrap_or(true);
        if due {
            self.last_overflow_warning_ms.insert(to, now_ms);
        }
        due
    }

    /// Enqueue `body` into every registered agent's mailbox, optionally
    /// excluding `from_id`. Returns the delivered count and any overflow
    /// events raised along the way.
    pub fn broadcast(
        &mut self,
        from_id: AgentId,
        body: Value,
        include_self: bool,
        now_ms: u64,
    ) -> (usize, Vec<IpcEvent>) {
        let targets: Vec<AgentId> = self
            .registry
            .all_ids()
            .filter(|&id| include_self || id != from_id)
            .collect();
        let mut events = Vec::with_capacity(targets.len());
        for target in &targets {
            if let Some(event) = self.send(from_id, *target, body.clone(), now_ms) {
                events.push(event);
            }
        }
        (targets.len(), events)
    }

    /// Dequeue up to `max` messages from `agent_id`'s mailbox, FIFO order.
    pub fn recv(&mut self, agent_id: AgentId, max: usize, now_ms: u64) -> Vec<ReceivedMessage> {
        let Some(queue) = self.boxes.get_mut(&agent_id) else {
            return Vec::new();
        };
        let take = max.min(queue.len());
        queue
            .drain(..take)
            .map(|m| m.into_received(now_ms))
            .collect()
    }

    pub fn depth(&self, agent_id: AgentId) -> usize {
        self.boxes.get(&agent_id).map(VecDeque::len).unwrap_or(0)
    }
}

impl Default for MailboxTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
