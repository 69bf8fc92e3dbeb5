// SPDX-License-Identifier: MIT

//! The kernel struct (§3 Ownership): ties every other `clove-*` crate
//! together behind one dispatcher. Everything here lives on the reactor
//! thread; the only concurrently-touched state is what each subsystem
//! already guards internally (the LLM reply queue, the tunnel queues).

use std::sync::Arc;

use clove_agent::{AgentAdapter, AgentManager, SandboxAdapter};
use clove_audit::{AuditConfig, AuditLog, ExecutionLog, RecordingConfig, ReplayLog};
use clove_core::{AgentIdAllocator, Clock, SystemClock};
use clove_events::EventBus;
use clove_ipc::MailboxTable;
use clove_llm::LlmGateway;
use clove_permissions::PermissionTable;
use clove_state::StateStore;

use crate::config::KernelConfig;
use crate::shutdown::ShutdownFlag;
use crate::tunnel::TunnelSurface;
use crate::world::WorldRegistry;

/// Every subsystem the dispatcher routes syscalls to, plus the shared id
/// allocator `clove-kernel::SocketServer` draws connection ids from (§3:
/// "a connecting client's id is strictly greater than every previously
/// assigned id" — the same sequence spawned sub-agents also draw from).
pub struct Kernel<A: AgentAdapter, C: Clock> {
    pub ids: Arc<AgentIdAllocator>,
    pub agents: AgentManager<A, C>,
    pub permissions: PermissionTable,
    pub mailboxes: MailboxTable,
    pub state: StateStore,
    pub events: EventBus,
    pub llm: LlmGateway,
    pub audit: AuditLog,
    pub execution: ExecutionLog,
    pub replay: Option<ReplayLog>,
    pub world: WorldRegistry,
    pub tunnel: TunnelSurface,
    pub clock: C,
    pub stop_timeout: std::time::Duration,
    last_sweep_ms: u64,
}

impl Kernel<SandboxAdapter, SystemClock> {
    /// Production constructor: real sandboxed processes, the real system
    /// clock, one shared id allocator handed to the socket server too.
    pub fn new(config: &KernelConfig, ids: Arc<AgentIdAllocator>) -> Self {
        Self::with_adapter_and_clock(config, ids, SandboxAdapter, SystemClock)
    }
}

impl<A: AgentAdapter, C: Clock> Kernel<A, C> {
    pub fn with_adapter_and_clock(
        config: &KernelConfig,
        ids: Arc<AgentIdAllocator>,
        adapter: A,
        clock: C,
    ) -> Self {
        let now_ms = clock.epoch_ms();
        Self {
            ids: Arc::clone(&ids),
            agents: AgentManager::with_ids(adapter, clock.clone(), ids),
            permissions: PermissionTable::new(),
            mailboxes: MailboxTable::with_capacity(config.mailbox_capacity),
            state: StateStore::new(),
            events: EventBus::with_capacity(config.event_queue_capacity),
            llm: LlmGateway::new(config.llm_config()),
            audit: AuditLog::new(AuditConfig {
                max_entries: config.audit_max_entries,
                ..AuditConfig::default()
            }),
            execution: ExecutionLog::new(RecordingConfig::default()),
            replay: None,
            world: WorldRegistry::new(),
            tunnel: TunnelSurface::new(),
            clock,
            stop_timeout: config.stop_timeout,
            last_sweep_ms: now_ms,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// Periodic maintenance run once per reactor tick (§4.2 `run()`): reap
    /// dead agents / realize due restarts, sweep expired state at least
    /// once a second, drain the tunnel event queue. Lifecycle transitions
    /// are translated into `AgentSpawned`-family events and audit entries
    /// by the caller (`crate::handlers::lifecycle::translate_lifecycle_event`)
    /// since only the kernel struct, not `clove-agent`, knows about the
    /// event bus and audit log.
    pub fn tick(&mut self) -> Vec<clove_agent::AgentLifecycleEvent> {
        let now_ms = self.now_ms();
        if now_ms.saturating_sub(self.last_sweep_ms) >= 1_000 {
            self.state.sweep(now_ms);
            self.last_sweep_ms = now_ms;
        }
        self.agents.tick()
    }

    /// Remove every trace of a disconnected (non-agent) socket client or a
    /// reaped agent: mailbox, registry binding, subscriptions, session
    /// state, and permission record.
    pub fn purge_agent(&mut self, id: clove_core::AgentId) {
        self.mailboxes.remove_agent(id);
        self.events.remove_agent(id);
        self.state.purge_session(id);
        self.permissions.remove(id);
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
