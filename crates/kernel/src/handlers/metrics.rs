// SPDX-License-Identifier: MIT

//! `METRICS_SNAPSHOT`/`METRICS_AGENT` (§4's `METRICS_*` group, `0xC0..0xC3`).
//! Reserved opcodes `0xC2`/`0xC3` are handled directly in
//! `handlers::route` since they carry no payload shape of their own yet.

use clove_agent::{AgentAdapter, AgentIdOrName};
use clove_core::{AgentId, Clock, Value};

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

pub fn snapshot<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let agents = kernel.agents.list();
    let running = agents.iter().filter(|a| a.running).count();
    let mut fields = serde_json::Map::new();
    fields.insert("agent_count".to_string(), serde_json::json!(agents.len()));
    fields.insert("agents_running".to_string(), serde_json::json!(running));
    fields.insert(
        "audit_entries".to_string(),
        serde_json::json!(kernel.audit.len()),
    );
    fields.insert(
        "state_entries".to_string(),
        serde_json::json!(kernel.state.len()),
    );
    fields.insert(
        "llm_worker_running".to_string(),
        serde_json::json!(kernel.llm.is_worker_running()),
    );
    ok_with(fields)
}

pub fn agent<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let target = if let Some(id) = request.get("id").and_then(Value::as_u64) {
        AgentIdOrName::Id(AgentId(id as u32))
    } else if let Some(name) = request.get("name").and_then(Value::as_str) {
        AgentIdOrName::Name(name.to_string())
    } else {
        return fail("message has neither `id` nor `name`");
    };

    let id = match kernel.agents.resolve(&target) {
        Ok(id) => id,
        Err(e) => return fail(e.to_string()),
    };
    let Some(summary) = kernel.agents.summary_of(id) else {
        return fail("agent vanished between resolve and lookup");
    };
    let permissions = kernel.permissions.get(id).cloned();

    let mut fields = serde_json::Map::new();
    fields.insert("summary".to_string(), serde_json::json!(summary));
    fields.insert("permissions".to_string(), serde_json::json!(permissions));
    fields.insert(
        "mailbox_depth".to_string(),
        serde_json::json!(kernel.mailboxes.depth(id)),
    );
    fields.insert(
        "event_queue_depth".to_string(),
        serde_json::json!(kernel.events.queue_depth(id)),
    );
    ok_with(fields)
}
