// SPDX-License-Identifier: MIT

//! `WORLD_CREATE`..`WORLD_RESTORE` (§4's `WORLD_*` group, `0xA0..0xA8`).

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

fn name_of(request: &Value) -> Result<&str, Value> {
    request.get("name").and_then(Value::as_str).ok_or_else(|| fail("missing `name` field"))
}

pub fn create<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.create(name) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}

pub fn destroy<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.destroy(name) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}

pub fn list<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("worlds".to_string(), serde_json::json!(kernel.world.list()));
    ok_with(fields)
}

pub fn join<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.join(name, agent_id) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}

pub fn leave<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.leave(name, agent_id) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}

pub fn emit<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.emit_event(name, agent_id) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}

pub fn state<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.state(name) {
        Ok(state) => {
            let mut fields = serde_json::Map::new();
            fields.insert("state".to_string(), state);
            ok_with(fields)
        }
        Err(e) => fail(e.to_string()),
    }
}

pub fn snapshot<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    match kernel.world.snapshot(name) {
        Ok(snapshot) => {
            let mut fields = serde_json::Map::new();
            fields.insert("snapshot".to_string(), snapshot);
            ok_with(fields)
        }
        Err(e) => fail(e.to_string()),
    }
}

pub fn restore<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let name = match name_of(request) {
        Ok(n) => n,
        Err(v) => return v,
    };
    let snapshot = request.get("snapshot").cloned().unwrap_or(Value::Null);
    match kernel.world.restore(name, snapshot) {
        Ok(()) => crate::dispatcher::ok(),
        Err(e) => fail(e.to_string()),
    }
}
