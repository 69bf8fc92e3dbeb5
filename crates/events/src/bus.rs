// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet, VecDeque};

use clove_core::AgentId;

use crate::event::{Event, EventType};

/// Per-subscriber queue bound (§5 Backpressure): "Event queues are bounded
/// (default 1 024 entries per subscriber), oldest-drop."
pub const DEFAULT_QUEUE_CAPACITY: usize = 1_024;

/// `ResourceWarning` is debounced to at most one per second per subscriber
/// (§4.10).
pub const RESOURCE_WARNING_DEBOUNCE_MS: u64 = 1_000;

/// Per-agent subscriptions and bounded delivery queues (§4.10). Owned by the
/// kernel; agents only ever see their own queue through `POLL_EVENTS`.
#[derive(Debug, Default)]
pub struct EventBus {
    capacity: usize,
    subscriptions: HashMap<AgentId, HashSet<EventType>>,
    queues: HashMap<AgentId, VecDeque<Event>>,
    last_warning_ms: HashMap<AgentId, u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            subscriptions: HashMap::new(),
            queues: HashMap::new(),
            last_warning_ms: HashMap::new(),
        }
    }

    /// `SUBSCRIBE`. Creates the agent's queue lazily if this is its first
    /// subscription.
    pub fn subscribe(&mut self, agent_id: AgentId, types: impl IntoIterator<Item = EventType>) {
        let set = self.subscriptions.entry(agent_id).or_default();
        set.extend(types);
        self.queues.entry(agent_id).or_default();
    }

    /// `UNSUBSCRIBE`.
    pub fn unsubscribe(&mut self, agent_id: AgentId, types: impl IntoIterator<Item = EventType>) {
        if let Some(set) = self.subscriptions.get_mut(&agent_id) {
            for t in types {
                set.remove(&t);
            }
        }
    }

    pub fn remove_agent(&mut self, agent_id: AgentId) {
        self.subscriptions.remove(&agent_id);
        self.queues.remove(&agent_id);
        self.last_warning_ms.remove(&agent_id);
    }

    /// `EMIT` / kernel-emitted events. Delivers `event` to every subscriber
    /// of its type, dropping the oldest queued event and raising a debounced
    /// `ResourceWarning` for any subscriber whose queue was already full.
    pub fn emit(&mut self, event: Event) {
        let subscribers: Vec<AgentId> = self
            .subscriptions
            .iter()
            .filter(|(_, types)| types.contains(&event.event_type))
            .map(|(id, _)| *id)
            .collect();

        for subscriber in subscribers {
            self.deliver(subscriber, event.clone());
        }
    }

    fn deliver(&mut self, subscriber: AgentId, event: Event) {
        let now_ms = event.timestamp_ms;
        let queue = self.queues.entry(subscriber).or_default();
        let overflowed = queue.len() >= self.capacity;
        if overflowed {
            queue.pop_front();
        }
        queue.push_back(event);

        if overflowed {
            let should_warn = match self.last_warning_ms.get(&subscriber) {
                None => true,
                Some(&last) => now_ms.saturating_sub(last) >= RESOURCE_WARNING_DEBOUNCE_MS,
            };
            if should_warn {
                self.last_warning_ms.insert(subscriber, now_ms);
                let warning = Event::kernel(
                    EventType::ResourceWarning,
                    serde_json::json!({"subscriber": subscriber, "reason": "event queue full"}),
                    now_ms,
                );
                // Deliver directly into the queue without recursing through
                // `emit`'s subscription filter — `ResourceWarning` goes to
                // the affected subscriber regardless of whether it
                // subscribed to that type (§4.10: "a single ResourceWarning
                // event is emitted to the affected subscriber").
                let queue = self.queues.entry(subscriber).or_default();
                if queue.len() >= self.capacity {
                    queue.pop_front();
                }
                queue.push_back(warning);
            }
        }
    }

    /// `POLL_EVENTS`. Dequeues up to `max` events, FIFO order.
    pub fn poll(&mut self, agent_id: AgentId, max: usize) -> Vec<Event> {
        let Some(queue) = self.queues.get_mut(&agent_id) else {
            return Vec::new();
        };
        let take = max.min(queue.len());
        queue.drain(..take).collect()
    }

    pub fn queue_depth(&self, agent_id: AgentId) -> usize {
        self.queues.get(&agent_id).map(VecDeque::len).unwrap_or(0)
    }

    pub fn subscriptions_of(&self, agent_id: AgentId) -> HashSet<EventType> {
        self.subscriptions.get(&agent_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
