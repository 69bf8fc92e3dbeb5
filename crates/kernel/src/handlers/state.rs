// SPDX-License-Identifier: MIT

//! `STORE`/`FETCH`/`DELETE`/`KEYS` (§4.9).

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};
use clove_events::{Event, EventType};
use clove_state::{Scope, StateError};

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

fn parse_scope(request: &Value) -> Scope {
    request
        .get("scope")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

pub fn store<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(key) = request.get("key").and_then(Value::as_str) else {
        return fail("missing `key` field");
    };
    let value = request.get("value").cloned().unwrap_or(Value::Null);
    let scope = parse_scope(request);
    let ttl_ms = request.get("ttl_ms").and_then(Value::as_u64);
    let now_ms = kernel.now_ms();

    match kernel
        .state
        .store(agent_id, key.to_string(), value, scope, ttl_ms, now_ms)
    {
        Ok(change) => {
            kernel.events.emit(Event::kernel(
                EventType::StateChanged,
                serde_json::json!({"key": change.key, "scope": change.scope, "op": "store"}),
                now_ms,
            ));
            crate::dispatcher::ok()
        }
        Err(StateError::NotOwner(key)) => fail(format!("key {key:?} is owned by another agent")),
        Err(e) => fail(e.to_string()),
    }
}

pub fn fetch<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(key) = request.get("key").and_then(Value::as_str) else {
        return fail("missing `key` field");
    };
    let now_ms = kernel.now_ms();
    match kernel.state.fetch(agent_id, key, now_ms) {
        Ok(value) => {
            let mut fields = serde_json::Map::new();
            fields.insert("value".to_string(), value);
            ok_with(fields)
        }
        Err(StateError::NotFound) => serde_json::json!({"success": false, "not_found": true}),
        Err(e) => fail(e.to_string()),
    }
}

pub fn delete<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(key) = request.get("key").and_then(Value::as_str) else {
        return fail("missing `key` field");
    };
    let now_ms = kernel.now_ms();
    let change = kernel.state.delete(agent_id, key, now_ms);
    kernel.events.emit(Event::kernel(
        EventType::StateChanged,
        serde_json::json!({"key": change.key, "scope": change.scope, "op": "delete"}),
        now_ms,
    ));
    crate::dispatcher::ok()
}

pub fn keys<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let prefix = request.get("prefix").and_then(Value::as_str);
    let now_ms = kernel.now_ms();
    let keys = kernel.state.keys(agent_id, prefix, now_ms);
    let mut fields = serde_json::Map::new();
    fields.insert("keys".to_string(), serde_json::json!(keys));
    ok_with(fields)
}
