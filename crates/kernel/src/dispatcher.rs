// SPDX-License-Identifier: MIT

//! The syscall dispatcher (§4.4): `handle_message` is the kernel's single
//! entry point. For every frame: permission pre-check, audit, recording,
//! then route to the opcode's handler. Unknown opcodes echo their payload
//! back unchanged (debug-friendly, per spec).
//!
//! The permission pre-check here only covers the whole-opcode capability
//! flags named in §4.7 (`can_exec`/`can_read`/`can_write`/`can_think`/
//! `can_spawn`/`can_http`); pattern-level checks (path globs, command
//! prefixes, domain suffixes, LLM quotas) and scope-based state-store
//! access control are each handler's own responsibility, since they need
//! payload fields this step doesn't parse.

use std::time::Instant;

use clove_agent::AgentAdapter;
use clove_audit::Category;
use clove_core::{AgentId, Clock, Value};
use clove_events::{Event, EventType};
use clove_wire::Opcode;

use crate::kernel::Kernel;

/// `{"success": true}`.
pub fn ok() -> Value {
    serde_json::json!({"success": true})
}

/// `{"success": true, ...fields}`.
pub fn ok_with(mut fields: serde_json::Map<String, Value>) -> Value {
    fields.insert("success".to_string(), Value::Bool(true));
    Value::Object(fields)
}

/// `{"success": false, "error": msg}`.
pub fn fail(msg: impl std::fmt::Display) -> Value {
    serde_json::json!({"success": false, "error": msg.to_string()})
}

fn is_success(response: &Value) -> bool {
    response.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Which capability flag (if any) gates an opcode outright, checked before
/// the handler ever runs (§4.4 step 1).
fn capability_gate(opcode: Opcode) -> Option<fn(&clove_permissions::PermissionRecord) -> bool> {
    match opcode {
        Opcode::Exec => Some(|r| r.can_exec),
        Opcode::Read => Some(|r| r.can_read),
        Opcode::Write => Some(|r| r.can_write),
        Opcode::Think => Some(|r| r.can_think),
        Opcode::Spawn => Some(|r| r.can_spawn),
        Opcode::Http => Some(|r| r.can_http),
        _ => None,
    }
}

/// Audit category an opcode's activity is logged under (§3 Categories).
fn category_for(opcode: Opcode) -> Category {
    match opcode {
        Opcode::Spawn | Opcode::Kill | Opcode::List | Opcode::Pause | Opcode::Resume => {
            Category::AgentLifecycle
        }
        Opcode::Send | Opcode::Recv | Opcode::Broadcast | Opcode::Register => Category::Ipc,
        Opcode::Store | Opcode::Fetch | Opcode::Delete | Opcode::Keys => Category::StateStore,
        Opcode::Http => Category::Network,
        Opcode::GetPerms | Opcode::SetPerms => Category::Security,
        Opcode::WorldCreate
        | Opcode::WorldDestroy
        | Opcode::WorldList
        | Opcode::WorldJoin
        | Opcode::WorldLeave
        | Opcode::WorldEvent
        | Opcode::WorldState
        | Opcode::WorldSnapshot
        | Opcode::WorldRestore => Category::World,
        _ => Category::Syscall,
    }
}

/// Emit `SyscallBlocked` and a `Security` audit entry for a permission
/// denial, then build the `{success:false, error}` response. Shared by the
/// dispatcher's capability pre-check and handlers that deny on
/// finer-grained permission grounds (`SET_PERMS` elevation, pattern
/// checks).
pub(crate) fn deny<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    opcode: Opcode,
    reason: &str,
) -> Value {
    let now_ms = kernel.now_ms();
    kernel.events.emit(Event::new(
        EventType::SyscallBlocked,
        serde_json::json!({"opcode": opcode.as_u8(), "reason": reason}),
        agent_id,
        now_ms,
    ));
    kernel.audit.record(
        Category::Security,
        format!("{opcode:?}"),
        agent_id,
        None,
        serde_json::json!({"reason": reason}),
        false,
        now_ms,
    );
    fail(format!("permission denied: {reason}"))
}

/// Result of dispatching one frame: the bytes to queue for the send buffer
/// plus whether the connection should be torn down afterward (`EXIT`).
pub struct DispatchResult {
    pub payload: Vec<u8>,
    pub close_connection: bool,
}

/// `handle_message` (§4.4). `opcode_raw`/`payload` come straight off the
/// wire; the agent id has already been overwritten with the server-assigned
/// one by the socket server.
pub fn handle_message<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    opcode_raw: u8,
    payload: &[u8],
) -> DispatchResult {
    let Some(opcode) = Opcode::from_u8(opcode_raw) else {
        // Unknown opcode: echo payload back unchanged, no audit/recording —
        // there is no opcode identity to log meaningfully (§4.4 step 4).
        return DispatchResult {
            payload: payload.to_vec(),
            close_connection: false,
        };
    };

    if opcode == Opcode::Noop {
        return DispatchResult {
            payload: payload.to_vec(),
            close_connection: false,
        };
    }

    if opcode == Opcode::Exit {
        kernel.purge_agent(agent_id);
        return DispatchResult {
            payload: payload.to_vec(),
            close_connection: true,
        };
    }

    let request_json: Value = serde_json::from_slice(payload).unwrap_or(Value::Null);
    let started = Instant::now();

    let response = if let Some(gate) = capability_gate(opcode) {
        let record = kernel.permissions.get_or_create(agent_id).clone();
        if gate(&record) {
            crate::handlers::route(kernel, agent_id, opcode, &request_json)
        } else {
            deny(kernel, agent_id, opcode, "capability not granted")
        }
    } else {
        crate::handlers::route(kernel, agent_id, opcode, &request_json)
    };

    let success = is_success(&response);
    let now_ms = kernel.now_ms();
    let category = category_for(opcode);
    if kernel.audit.config().is_enabled(category) {
        kernel.audit.record(
            category,
            format!("{opcode:?}"),
            agent_id,
            kernel.mailboxes.registry().name_of(agent_id).map(str::to_string),
            request_json.clone(),
            success,
            now_ms,
        );
    }

    let duration_us = started.elapsed().as_micros() as u64;
    kernel.execution.append(
        opcode,
        agent_id,
        request_json,
        response.clone(),
        duration_us,
        success,
        now_ms,
    );

    let mut bytes = Vec::new();
    // A malformed-to-JSON response body never happens in practice (every
    // handler returns a `serde_json::json!` object), but fall back to an
    // empty object rather than panicking on the hot path.
    if serde_json::to_writer(&mut bytes, &response).is_err() {
        bytes = b"{}".to_vec();
    }

    DispatchResult {
        payload: bytes,
        close_connection: false,
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
