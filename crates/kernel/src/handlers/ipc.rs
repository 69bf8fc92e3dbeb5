// SPDX-License-Identifier: MIT

//! `SEND`/`RECV`/`BROADCAST`/`REGISTER` (§4.8).

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};
use clove_events::{Event, EventType};
use clove_ipc::IpcEvent;

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

fn translate<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, event: IpcEvent, now_ms: u64) {
    match event {
        IpcEvent::MessageReceived { to } => {
            kernel.events.emit(Event::kernel(
                EventType::MessageReceived,
                serde_json::json!({"to": to}),
                now_ms,
            ));
        }
        IpcEvent::MailboxOverflow { to } => {
            kernel.events.emit(Event::kernel(
                EventType::ResourceWarning,
                serde_json::json!({"to": to, "reason": "mailbox full"}),
                now_ms,
            ));
        }
    }
}

pub fn register<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(name) = request.get("name").and_then(Value::as_str) else {
        return fail("missing `name` field");
    };
    match kernel.mailboxes.register(agent_id, name.to_string()) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}

pub fn send<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let to = request
        .get("to")
        .and_then(Value::as_u64)
        .map(|n| AgentId(n as u32));
    let to_name = request.get("to_name").and_then(Value::as_str);
    let target = match kernel.mailboxes.resolve_target(to, to_name) {
        Ok(id) => id,
        Err(e) => return fail(e.to_string()),
    };
    let body = request.get("message").cloned().unwrap_or(Value::Null);
    let now_ms = kernel.now_ms();
    if let Some(event) = kernel.mailboxes.send(agent_id, target, body, now_ms) {
        translate(kernel, event, now_ms);
    }
    let mut fields = serde_json::Map::new();
    fields.insert("delivered_to".to_string(), serde_json::json!(target));
    ok_with(fields)
}

pub fn recv<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let max = request.get("max").and_then(Value::as_u64).unwrap_or(10) as usize;
    let now_ms = kernel.now_ms();
    let messages = kernel.mailboxes.recv(agent_id, max, now_ms);
    let mut fields = serde_json::Map::new();
    fields.insert("messages".to_string(), serde_json::json!(messages));
    ok_with(fields)
}

pub fn broadcast<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let body = request.get("message").cloned().unwrap_or(Value::Null);
    let include_self = request
        .get("include_self")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let now_ms = kernel.now_ms();
    let (count, events) = kernel.mailboxes.broadcast(agent_id, body, include_self, now_ms);
    for event in events {
        translate(kernel, event, now_ms);
    }
    let mut fields = serde_json::Map::new();
    fields.insert("delivered".to_string(), serde_json::json!(count));
    ok_with(fields)
}
