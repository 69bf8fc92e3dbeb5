// SPDX-License-Identifier: MIT

//! Per-opcode-group handlers (§4): everything `dispatcher::handle_message`
//! routes to once an opcode has cleared its whole-opcode capability gate.
//! Each submodule owns one group's pattern-level permission checks (path
//! globs, command prefixes, domain suffixes, LLM quotas, scope-based state
//! access) and the translation between wire JSON and the subsystem it
//! fronts.

mod audit;
mod core;
mod events;
mod ipc;
pub mod lifecycle;
mod metrics;
mod network;
mod permissions;
mod record;
mod state;
mod tunnel;
mod world;

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};
use clove_wire::Opcode;

use crate::kernel::Kernel;

/// Dispatch an already-permission-gated opcode to its handler. `NOOP` and
/// `EXIT` never reach here — `dispatcher::handle_message` intercepts both
/// before routing (§4.4).
pub fn route<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    opcode: Opcode,
    request: &Value,
) -> Value {
    match opcode {
        Opcode::Think => core::think(kernel, agent_id, request),
        Opcode::Exec => core::exec(kernel, agent_id, request),
        Opcode::Read => core::read(kernel, agent_id, request),
        Opcode::Write => core::write(kernel, agent_id, request),

        Opcode::Spawn => lifecycle::spawn(kernel, agent_id, request),
        Opcode::Kill => lifecycle::kill(kernel, agent_id, request),
        Opcode::List => lifecycle::list(kernel),
        Opcode::Pause => lifecycle::pause(kernel, agent_id, request),
        Opcode::Resume => lifecycle::resume(kernel, agent_id, request),

        Opcode::Send => ipc::send(kernel, agent_id, request),
        Opcode::Recv => ipc::recv(kernel, agent_id, request),
        Opcode::Broadcast => ipc::broadcast(kernel, agent_id, request),
        Opcode::Register => ipc::register(kernel, agent_id, request),

        Opcode::Store => state::store(kernel, agent_id, request),
        Opcode::Fetch => state::fetch(kernel, agent_id, request),
        Opcode::Delete => state::delete(kernel, agent_id, request),
        Opcode::Keys => state::keys(kernel, agent_id, request),

        Opcode::GetPerms => permissions::get_perms(kernel, agent_id, request),
        Opcode::SetPerms => permissions::set_perms(kernel, agent_id, request),

        Opcode::Http => network::http(kernel, agent_id, request),

        Opcode::Subscribe => events::subscribe(kernel, agent_id, request),
        Opcode::Unsubscribe => events::unsubscribe(kernel, agent_id, request),
        Opcode::PollEvents => events::poll_events(kernel, agent_id, request),
        Opcode::Emit => events::emit(kernel, agent_id, request),

        Opcode::RecordStart => record::record_start(kernel, request),
        Opcode::RecordStop => record::record_stop(kernel),
        Opcode::RecordStatus => record::record_status(kernel),
        Opcode::ReplayStart => record::replay_start(kernel, request),
        Opcode::ReplayStatus => record::replay_status(kernel),

        Opcode::GetAuditLog => audit::get_audit_log(kernel, request),
        Opcode::SetAuditConfig => audit::set_audit_config(kernel, request),

        Opcode::WorldCreate => world::create(kernel, request),
        Opcode::WorldDestroy => world::destroy(kernel, request),
        Opcode::WorldList => world::list(kernel),
        Opcode::WorldJoin => world::join(kernel, agent_id, request),
        Opcode::WorldLeave => world::leave(kernel, agent_id, request),
        Opcode::WorldEvent => world::emit(kernel, agent_id, request),
        Opcode::WorldState => world::state(kernel, request),
        Opcode::WorldSnapshot => world::snapshot(kernel, request),
        Opcode::WorldRestore => world::restore(kernel, request),

        Opcode::TunnelConnect => tunnel::connect(kernel),
        Opcode::TunnelDisconnect => tunnel::disconnect(kernel),
        Opcode::TunnelStatus => tunnel::status(kernel),
        Opcode::TunnelListRemotes => tunnel::list_remotes(kernel),
        Opcode::TunnelConfig => tunnel::config(kernel, request),

        Opcode::MetricsSnapshot => metrics::snapshot(kernel),
        Opcode::MetricsAgent => metrics::agent(kernel, request),
        Opcode::MetricsReservedC2 | Opcode::MetricsReservedC3 => {
            serde_json::json!({"error": "not implemented"})
        }

        // Intercepted by `dispatcher::handle_message` before routing.
        Opcode::Noop | Opcode::Exit => unreachable!("NOOP/EXIT never reach handlers::route"),
    }
}
