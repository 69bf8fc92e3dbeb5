// SPDX-License-Identifier: MIT

//! The lifecycle manager: the single owner of every [`Agent`] and its process
//! handle. Everything here runs on the reactor thread — no locks, no
//! background tasks (§4.5).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nix::sys::signal::Signal;

use clove_core::{AgentId, AgentIdAllocator, Clock};

use crate::agent::{Agent, AgentSummary};
use crate::error::{AgentError, AgentIdOrName};
use crate::process::{AgentAdapter, ProcessHandle};
use crate::restart::{PendingRestart, RestartState};
use crate::spec::SpawnSpec;
use crate::state::AgentState;

/// A lifecycle transition the manager could not fold into its own state —
/// surfaced so the kernel can translate it into an audit record and an
/// `EventType` without `clove-agent` depending on `clove-events` directly.
#[derive(Debug, Clone)]
pub enum AgentLifecycleEvent {
    Exited {
        id: AgentId,
        name: Option<String>,
        exit_code: Option<i32>,
    },
    Restarting {
        id: AgentId,
        name: Option<String>,
        attempt: u32,
        exit_code: Option<i32>,
    },
    Escalated {
        id: AgentId,
        name: Option<String>,
    },
}

/// Owns every agent's state, saved spec, and process handle. Generic over
/// [`AgentAdapter`] so tests substitute a fake launcher, and over [`Clock`] so
/// restart backoff is deterministic under test.
pub struct AgentManager<A: AgentAdapter, C: Clock> {
    adapter: A,
    clock: C,
    ids: Arc<AgentIdAllocator>,
    agents: HashMap<AgentId, Agent<A::Handle>>,
    names: HashMap<String, AgentId>,
    pending_restarts: HashMap<AgentId, PendingRestart>,
}

impl<A: AgentAdapter, C: Clock> AgentManager<A, C> {
    pub fn new(adapter: A, clock: C) -> Self {
        Self::with_ids(adapter, clock, Arc::new(AgentIdAllocator::new()))
    }

    /// Share an id allocator with another component — `clove-kernel` hands
    /// in the same allocator its socket server uses to number connecting
    /// clients, so connection ids and spawned-sub-agent ids come out of one
    /// monotonic sequence (§3: "a connecting client's id is strictly
    /// greater than every previously assigned id").
    pub fn with_ids(adapter: A, clock: C, ids: Arc<AgentIdAllocator>) -> Self {
        Self {
            adapter,
            clock,
            ids,
            agents: HashMap::new(),
            names: HashMap::new(),
            pending_restarts: HashMap::new(),
        }
    }

    /// Resolve a caller-supplied id or name to a live entry's id.
    pub fn resolve(&self, target: &AgentIdOrName) -> Result<AgentId, AgentError> {
        match target {
            AgentIdOrName::Id(id) => {
                if self.agents.contains_key(id) {
                    Ok(*id)
                } else {
                    Err(AgentError::NotFound(target.clone()))
                }
            }
            AgentIdOrName::Name(name) => self
                .names
                .get(name)
                .copied()
                .ok_or_else(|| AgentError::NotFound(target.clone())),
        }
    }

    pub fn list(&self) -> Vec<AgentSummary> {
        let mut summaries: Vec<_> = self.agents.values().map(Agent::summary).collect();
        summaries.sort_by_key(|s| s.id.0);
        summaries
    }

    /// Snapshot row for a single agent, used when a handler needs to echo
    /// back the pid/state it just caused rather than the whole roster.
    pub fn summary_of(&self, id: AgentId) -> Option<AgentSummary> {
        self.agents.get(&id).map(Agent::summary)
    }

    pub fn parent_of(&self, id: AgentId) -> Option<AgentId> {
        self.agents.get(&id).map(|a| a.parent_id)
    }

    /// Launch a new agent under `parent_id` (`AgentId::KERNEL` for a
    /// top-level agent spawned directly by a client).
    pub fn spawn(&mut self, parent_id: AgentId, spec: SpawnSpec) -> Result<AgentId, AgentError> {
        if let Some(name) = &spec.name {
            if self.names.contains_key(name) {
                return Err(AgentError::DuplicateName(name.clone()));
            }
        }

        let id = self.ids.next();
        let sandbox_name = format!("agent-{id}");
        let handle = self
            .adapter
            .spawn(&sandbox_name, &spec)
            .map_err(AgentError::SpawnFailed)?;

        let restart_state = spec
            .restart
            .as_ref()
            .map(|_| RestartState::new(self.clock.epoch_ms()));
        let name = spec.name.clone();

        let agent = Agent {
            id,
            name: name.clone(),
            state: AgentState::Running,
            parent_id,
            children: Vec::new(),
            created_at_ms: self.clock.epoch_ms(),
            handle: Some(handle),
            saved_spec: Some(spec),
            restart_state,
        };

        if let Some(name) = &name {
            self.names.insert(name.clone(), id);
        }
        if let Some(parent) = self.agents.get_mut(&parent_id) {
            parent.children.push(id);
        }
        self.agents.insert(id, agent);

        Ok(id)
    }

    pub fn pause(&mut self, target: AgentId) -> Result<(), AgentError> {
        let agent = self
            .agents
            .get_mut(&target)
            .ok_or_else(|| AgentError::NotFound(AgentIdOrName::Id(target)))?;
        if !agent.state.can_pause() {
            return Err(AgentError::InvalidTransition(target, agent.state));
        }
        if let Some(handle) = &agent.handle {
            handle
                .send_signal(Signal::SIGSTOP)
                .map_err(AgentError::SignalFailed)?;
        }
        agent.state = AgentState::Paused;
        Ok(())
    }

    pub fn resume(&mut self, target: AgentId) -> Result<(), AgentError> {
        let agent = self
            .agents
            .get_mut(&target)
            .ok_or_else(|| AgentError::NotFound(AgentIdOrName::Id(target)))?;
        if !agent.state.can_resume() {
            return Err(AgentError::InvalidTransition(target, agent.state));
        }
        if let Some(handle) = &agent.handle {
            handle
                .send_signal(Signal::SIGCONT)
                .map_err(AgentError::SignalFailed)?;
        }
        agent.state = AgentState::Running;
        Ok(())
    }

    /// Send `SIGTERM`, poll for exit until `timeout` elapses, then escalate
    /// to `SIGKILL`. Per §5, this is a sanctioned bounded blocking call on the
    /// reactor thread, not an async/background mechanism. Uses the real
    /// wall clock rather than `self.clock`: teardown timing is a property of
    /// the OS process, not of the restart scheduler under test.
    pub fn stop(&mut self, target: AgentId, timeout: Duration) -> Result<(), AgentError> {
        let state = self
            .agents
            .get(&target)
            .map(|a| a.state)
            .ok_or_else(|| AgentError::NotFound(AgentIdOrName::Id(target)))?;
        if !state.can_stop() {
            return Err(AgentError::InvalidTransition(target, state));
        }

        {
            #[allow(clippy::expect_used)]
            let agent = self.agents.get_mut(&target).expect("checked above");
            agent.state = AgentState::Stopping;
            if let Some(handle) = &agent.handle {
                handle
                    .send_signal(Signal::SIGTERM)
                    .map_err(AgentError::SignalFailed)?;
            }
        }

        let poll_interval = Duration::from_millis(20).min(timeout.max(Duration::from_millis(1)));
        let deadline = Instant::now() + timeout;
        loop {
            let still_running = {
                #[allow(clippy::expect_used)]
                let agent = self.agents.get_mut(&target).expect("checked above");
                agent
                    .handle
                    .as_mut()
                    .map(|h| h.is_running())
                    .unwrap_or(false)
            };
            if !still_running {
                break;
            }
            if Instant::now() >= deadline {
                #[allow(clippy::expect_used)]
                let agent = self.agents.get(&target).expect("checked above");
                if let Some(handle) = &agent.handle {
                    let _ = handle.send_signal(Signal::SIGKILL);
                }
                break;
            }
            std::thread::sleep(poll_interval);
        }

        self.finalize_stopped(target);
        Ok(())
    }

    fn finalize_stopped(&mut self, target: AgentId) {
        if let Some(agent) = self.agents.get_mut(&target) {
            if let Some(handle) = agent.handle.take() {
                handle.teardown();
            }
            agent.state = AgentState::Stopped;
            if let Some(name) = &agent.name {
                self.names.remove(name);
            }
        }
        self.pending_restarts.remove(&target);
    }

    /// Reactor tick: reap processes that exited on their own, then realize
    /// any restart whose backoff has elapsed. Two passes so a restart
    /// scheduled this tick never fires before the next one (§4.5).
    pub fn tick(&mut self) -> Vec<AgentLifecycleEvent> {
        let mut events = Vec::new();
        let now_ms = self.clock.epoch_ms();

        let live_ids: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|(_, a)| a.handle.is_some() && a.state.is_live())
            .map(|(id, _)| *id)
            .collect();

        for id in live_ids {
            let still_running = {
                #[allow(clippy::expect_used)]
                let agent = self.agents.get_mut(&id).expect("collected above");
                agent
                    .handle
                    .as_mut()
                    .map(|h| h.is_running())
                    .unwrap_or(false)
            };
            if still_running {
                continue;
            }
            events.extend(self.handle_exit(id, now_ms));
        }

        let due: Vec<AgentId> = self
            .pending_restarts
            .iter()
            .filter(|(_, pending)| pending.due_at_ms <= now_ms)
            .map(|(id, _)| *id)
            .collect();

        for id in due {
            self.pending_restarts.remove(&id);
            if let Some(event) = self.realize_restart(id) {
                events.push(event);
            }
        }

        events
    }

    fn handle_exit(&mut self, id: AgentId, now_ms: u64) -> Vec<AgentLifecycleEvent> {
        let mut events = Vec::new();

        let exit_code = {
            #[allow(clippy::expect_used)]
            let agent = self.agents.get_mut(&id).expect("exists");
            let code = agent.handle.as_ref().and_then(|h| h.exit_code());
            if let Some(handle) = agent.handle.take() {
                handle.teardown();
            }
            code
        };

        let (name, restart_config) = {
            #[allow(clippy::expect_used)]
            let agent = self.agents.get(&id).expect("exists");
            (
                agent.name.clone(),
                agent.saved_spec.as_ref().and_then(|s| s.restart.clone()),
            )
        };

        events.push(AgentLifecycleEvent::Exited {
            id,
            name: name.clone(),
            exit_code,
        });

        let Some(config) = restart_config else {
            self.finalize_non_restarting(id);
            return events;
        };

        if !config.policy.should_restart(exit_code) {
            self.finalize_non_restarting(id);
            return events;
        }

        #[allow(clippy::expect_used)]
        let agent = self.agents.get_mut(&id).expect("exists");
        let restart_state = agent
            .restart_state
            .get_or_insert_with(|| RestartState::new(now_ms));
        restart_state.roll_window_if_expired(now_ms, config.restart_window_sec);

        if restart_state.at_limit(config.max_restarts) {
            restart_state.escalated = true;
            agent.state = AgentState::Failed;
            if let Some(name) = &agent.name {
                self.names.remove(name);
            }
            events.push(AgentLifecycleEvent::Escalated { id, name });
            return events;
        }

        let backoff_ms = restart_state.next_backoff_ms(&config);
        restart_state.restart_count += 1;
        restart_state.consecutive_failures += 1;
        let attempt = restart_state.restart_count;
        agent.state = AgentState::Stopped;

        self.pending_restarts.insert(
            id,
            PendingRestart {
                agent_name: name.clone(),
                due_at_ms: now_ms + backoff_ms,
            },
        );
        events.push(AgentLifecycleEvent::Restarting {
            id,
            name,
            attempt,
            exit_code,
        });

        events
    }

    fn finalize_non_restarting(&mut self, id: AgentId) {
        if let Some(agent) = self.agents.get_mut(&id) {
            let exit_code = agent.handle.as_ref().and_then(|h| h.exit_code());
            agent.state = match exit_code {
                Some(0) => AgentState::Stopped,
                _ => AgentState::Failed,
            };
            if let Some(name) = &agent.name {
                self.names.remove(name);
            }
        }
    }

    fn realize_restart(&mut self, id: AgentId) -> Option<AgentLifecycleEvent> {
        let spec = self.agents.get(&id)?.saved_spec.clone()?;
        let sandbox_name = format!("agent-{id}-r{}", self.clock.epoch_ms());

        match self.adapter.spawn(&sandbox_name, &spec) {
            Ok(handle) => {
                let agent = self.agents.get_mut(&id)?;
                agent.handle = Some(handle);
                agent.state = AgentState::Running;
                if let Some(name) = &agent.name {
                    self.names.insert(name.clone(), id);
                }
                None
            }
            Err(e) => {
                tracing::warn!(agent = %id, error = %e, "restart spawn failed");
                let agent = self.agents.get_mut(&id)?;
                agent.state = AgentState::Failed;
                Some(AgentLifecycleEvent::Escalated {
                    id,
                    name: agent.name.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
