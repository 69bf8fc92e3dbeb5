// SPDX-License-Identifier: MIT

//! `SUBSCRIBE`/`UNSUBSCRIBE`/`POLL_EVENTS`/`EMIT` (§4.10).

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};
use clove_events::{Event, EventType};

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

fn parse_types(request: &Value) -> Result<Vec<EventType>, String> {
    let Some(types) = request.get("types").and_then(Value::as_array) else {
        return Err("missing `types` field".to_string());
    };
    types
        .iter()
        .map(|v| serde_json::from_value::<EventType>(v.clone()).map_err(|e| e.to_string()))
        .collect()
}

pub fn subscribe<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    match parse_types(request) {
        Ok(types) => {
            kernel.events.subscribe(agent_id, types);
            crate::dispatcher::ok()
        }
        Err(e) => fail(e),
    }
}

pub fn unsubscribe<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    match parse_types(request) {
        Ok(types) => {
            kernel.events.unsubscribe(agent_id, types);
            crate::dispatcher::ok()
        }
        Err(e) => fail(e),
    }
}

pub fn poll_events<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let max = request.get("max").and_then(Value::as_u64).unwrap_or(100) as usize;
    let events = kernel.events.poll(agent_id, max);
    let mut fields = serde_json::Map::new();
    fields.insert("events".to_string(), serde_json::json!(events));
    ok_with(fields)
}

pub fn emit<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let event_type = match request.get("type").cloned() {
        Some(v) => match serde_json::from_value::<EventType>(v) {
            Ok(t) => t,
            Err(e) => return fail(format!("invalid `type`: {e}")),
        },
        None => return fail("missing `type` field"),
    };
    let data = request.get("data").cloned().unwrap_or(Value::Null);
    let now_ms = kernel.now_ms();
    kernel.events.emit(Event::new(event_type, data, agent_id, now_ms));
    crate::dispatcher::ok()
}
