// SPDX-License-Identifier: MIT

//! `SPAWN`/`KILL`/`LIST`/`PAUSE`/`RESUME` (§4.5) plus the translation of
//! `clove-agent`'s decoupled [`clove_agent::AgentLifecycleEvent`]s into
//! event-bus emissions and audit entries, since only the kernel struct
//! knows about both.

use clove_agent::{AgentAdapter, AgentIdOrName, AgentLifecycleEvent, RestartConfig, SpawnSpec};
use clove_audit::Category;
use clove_core::{AgentId, Clock, Value};
use clove_events::{Event, EventType};
use clove_sandbox::ResourceLimits;

use crate::dispatcher::{fail, ok_with};
use crate::kernel::Kernel;

fn resolve_target(request: &Value) -> Result<AgentIdOrName, String> {
    if let Some(id) = request.get("id").and_then(Value::as_u64) {
        return Ok(AgentIdOrName::Id(AgentId(id as u32)));
    }
    if let Some(name) = request.get("name").and_then(Value::as_str) {
        return Ok(AgentIdOrName::Name(name.to_string()));
    }
    Err("message has neither `id` nor `name`".to_string())
}

fn parse_limits(v: &Value) -> ResourceLimits {
    ResourceLimits {
        memory_bytes: v.get("memory").and_then(Value::as_u64),
        cpu_quota_us: v.get("cpu_quota").and_then(Value::as_u64),
        cpu_period_us: v
            .get("cpu_period")
            .and_then(Value::as_u64)
            .unwrap_or(100_000),
        cpu_shares: v.get("cpu_shares").and_then(Value::as_u64).map(|n| n as u32),
        max_pids: v.get("max_pids").and_then(Value::as_u64).map(|n| n as u32),
    }
}

pub fn spawn<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    caller: AgentId,
    request: &Value,
) -> Value {
    let Some(script) = request.get("script").and_then(Value::as_str) else {
        return fail("missing `script` field");
    };
    let name = request.get("name").and_then(Value::as_str).map(str::to_string);
    let python = request.get("python").and_then(Value::as_bool).unwrap_or(false);
    let sandboxed = request.get("sandboxed").and_then(Value::as_bool).unwrap_or(true);
    let network = request.get("network").and_then(Value::as_bool).unwrap_or(true);

    let (command, args) = if python {
        ("python3".to_string(), vec![script.to_string()])
    } else {
        (script.to_string(), Vec::new())
    };

    let limits = request.get("limits").map(parse_limits).unwrap_or_default();
    let restart = match request.get("restart") {
        Some(v) => match serde_json::from_value::<RestartConfig>(v.clone()) {
            Ok(cfg) => Some(cfg),
            Err(e) => return fail(format!("invalid `restart` config: {e}")),
        },
        None => None,
    };

    let spec = SpawnSpec {
        name: name.clone(),
        script: command,
        args,
        cwd: None,
        env: Vec::new(),
        sandboxed,
        network,
        limits,
        restart,
    };

    match kernel.agents.spawn(caller, spec) {
        Ok(id) => {
            let now_ms = kernel.now_ms();
            let summary = kernel.agents.summary_of(id);
            kernel.events.emit(Event::new(
                EventType::AgentSpawned,
                serde_json::json!({"id": id, "name": name, "parent_id": caller}),
                caller,
                now_ms,
            ));
            kernel.audit.record(
                Category::AgentLifecycle,
                "AgentSpawned",
                id,
                name.clone(),
                serde_json::json!({"parent_id": caller}),
                true,
                now_ms,
            );
            let mut fields = serde_json::Map::new();
            fields.insert("id".to_string(), serde_json::json!(id));
            fields.insert("name".to_string(), serde_json::json!(name));
            fields.insert(
                "pid".to_string(),
                serde_json::json!(summary.and_then(|s| s.pid)),
            );
            fields.insert("status".to_string(), serde_json::json!("running"));
            ok_with(fields)
        }
        Err(e) => fail(e.to_string()),
    }
}

pub fn kill<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    _caller: AgentId,
    request: &Value,
) -> Value {
    let target = match resolve_target(request) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    let id = match kernel.agents.resolve(&target) {
        Ok(id) => id,
        Err(e) => return fail(e.to_string()),
    };
    match kernel.agents.stop(id, kernel.stop_timeout) {
        Ok(()) => {
            let mut fields = serde_json::Map::new();
            fields.insert("killed".to_string(), Value::Bool(true));
            ok_with(fields)
        }
        Err(e) => fail(e.to_string()),
    }
}

pub fn list<A: AgentAdapter, C: Clock>(kernel: &mut Kernel<A, C>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("agents".to_string(), serde_json::json!(kernel.agents.list()));
    ok_with(fields)
}

pub fn pause<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    _caller: AgentId,
    request: &Value,
) -> Value {
    let target = match resolve_target(request) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    let id = match kernel.agents.resolve(&target) {
        Ok(id) => id,
        Err(e) => return fail(e.to_string()),
    };
    match kernel.agents.pause(id) {
        Ok(()) => {
            let now_ms = kernel.now_ms();
            kernel.events.emit(Event::kernel(
                EventType::AgentPaused,
                serde_json::json!({"id": id}),
                now_ms,
            ));
            crate::dispatcher::ok()
        }
        Err(e) => fail(e.to_string()),
    }
}

pub fn resume<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    _caller: AgentId,
    request: &Value,
) -> Value {
    let target = match resolve_target(request) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    let id = match kernel.agents.resolve(&target) {
        Ok(id) => id,
        Err(e) => return fail(e.to_string()),
    };
    match kernel.agents.resume(id) {
        Ok(()) => {
            let now_ms = kernel.now_ms();
            kernel.events.emit(Event::kernel(
                EventType::AgentResumed,
                serde_json::json!({"id": id}),
                now_ms,
            ));
            crate::dispatcher::ok()
        }
        Err(e) => fail(e.to_string()),
    }
}

/// Translate one reactor-tick lifecycle transition into its event-bus
/// emission and audit entry (§4.5, §4.10). Called from the main loop after
/// every `Kernel::tick`.
pub fn translate_lifecycle_event<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    event: AgentLifecycleEvent,
) {
    let now_ms = kernel.now_ms();
    match event {
        AgentLifecycleEvent::Exited { id, name, exit_code } => {
            kernel.events.emit(Event::kernel(
                EventType::AgentExited,
                serde_json::json!({"id": id, "exit_code": exit_code}),
                now_ms,
            ));
            kernel.audit.record(
                Category::AgentLifecycle,
                "AgentExited",
                id,
                name,
                serde_json::json!({"exit_code": exit_code}),
                exit_code == Some(0),
                now_ms,
            );
        }
        AgentLifecycleEvent::Restarting {
            id,
            name,
            attempt,
            exit_code,
        } => {
            kernel.events.emit(Event::kernel(
                EventType::AgentRestarting,
                serde_json::json!({"id": id, "name": name, "restart_count": attempt, "exit_code": exit_code}),
                now_ms,
            ));
            kernel.audit.record(
                Category::AgentLifecycle,
                "AgentRestarting",
                id,
                name,
                serde_json::json!({"restart_count": attempt, "exit_code": exit_code}),
                true,
                now_ms,
            );
        }
        AgentLifecycleEvent::Escalated { id, name } => {
            kernel.events.emit(Event::kernel(
                EventType::AgentEscalated,
                serde_json::json!({"id": id, "name": name}),
                now_ms,
            ));
            kernel.audit.record(
                Category::AgentLifecycle,
                "AgentEscalated",
                id,
                name,
                serde_json::json!({}),
                false,
                now_ms,
            );
        }
    }
}
