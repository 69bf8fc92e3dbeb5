// SPDX-License-Identifier: MIT

//! `GET_AUDIT_LOG`/`SET_AUDIT_CONFIG` (§4.12).

use clove_agent::AgentAdapter;
use clove_audit::{AuditConfig, AuditQuery, Category};
use clove_core::{AgentId, Clock, Value};

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

pub fn get_audit_log<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    let category = match request.get("category").cloned() {
        Some(v) => match serde_json::from_value::<Category>(v) {
            Ok(c) => Some(c),
            Err(e) => return fail(format!("invalid `category`: {e}")),
        },
        None => None,
    };
    let agent_id = request
        .get("agent_id")
        .and_then(Value::as_u64)
        .map(|n| AgentId(n as u32));
    let since_id = request.get("since_id").and_then(Value::as_u64);
    let limit = request.get("limit").and_then(Value::as_u64).map(|n| n as usize);

    let query = AuditQuery {
        category,
        agent_id,
        since_id,
        limit,
    };
    let entries = kernel.audit.query(&query);
    let mut fields = serde_json::Map::new();
    fields.insert("entries".to_string(), serde_json::json!(entries));
    ok_with(fields)
}

pub fn set_audit_config<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>, request: &Value) -> Value {
    match serde_json::from_value::<AuditConfig>(request.clone()) {
        Ok(config) => {
            kernel.audit.set_config(config);
            crate::dispatcher::ok()
        }
        Err(e) => fail(format!("invalid audit config: {e}")),
    }
}
