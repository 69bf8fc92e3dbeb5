// SPDX-License-Identifier: MIT

//! `GET_PERMS`/`SET_PERMS` (§4.7). `SET_PERMS` accepts either a preset name
//! or a full record literal; both go through [`PermissionTable::set`]'s
//! elevation check (self always allowed, another agent's record requires
//! `can_spawn`), which `GET_PERMS` mirrors for symmetry (the spec does not
//! say whether reading another agent's record is restricted, so the
//! elevation rule is applied consistently to both directions — see
//! DESIGN.md).

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};
use clove_permissions::{PermissionError, PermissionPreset, PermissionRecord};

use crate::dispatcher::{deny, fail, ok_with};
use crate::kernel::Kernel;

fn target_of(request: &Value, caller: AgentId) -> AgentId {
    request
        .get("agent_id")
        .and_then(Value::as_u64)
        .map(|n| AgentId(n as u32))
        .unwrap_or(caller)
}

pub fn get_perms<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    caller: AgentId,
    request: &Value,
) -> Value {
    let target = target_of(request, caller);
    if target != caller {
        let caller_record = kernel.permissions.get_or_create(caller).clone();
        if !caller_record.can_spawn {
            return deny(kernel, caller, clove_wire::Opcode::GetPerms, "cannot read another agent's permissions");
        }
    }
    let record = kernel.permissions.get_or_create(target).clone();
    let mut fields = serde_json::Map::new();
    fields.insert("agent_id".to_string(), serde_json::json!(target));
    fields.insert("permissions".to_string(), serde_json::json!(record));
    ok_with(fields)
}

pub fn set_perms<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    caller: AgentId,
    request: &Value,
) -> Value {
    let target = target_of(request, caller);

    let result = if let Some(preset_value) = request.get("preset") {
        match serde_json::from_value::<PermissionPreset>(preset_value.clone()) {
            Ok(preset) => kernel.permissions.set_preset(caller, target, preset),
            Err(e) => return fail(format!("invalid `preset`: {e}")),
        }
    } else if let Some(record_value) = request.get("record") {
        match serde_json::from_value::<PermissionRecord>(record_value.clone()) {
            Ok(record) => kernel.permissions.set(caller, target, record),
            Err(e) => return fail(format!("invalid `record`: {e}")),
        }
    } else {
        return fail("message has neither `preset` nor `record`");
    };

    match result {
        Ok(()) => {
            let mut fields = serde_json::Map::new();
            fields.insert("agent_id".to_string(), serde_json::json!(target));
            ok_with(fields)
        }
        Err(PermissionError::ElevationRequired { .. }) => {
            deny(kernel, caller, clove_wire::Opcode::SetPerms, "elevation required: can_spawn not granted")
        }
        Err(e) => fail(e.to_string()),
    }
}
