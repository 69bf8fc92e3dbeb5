// SPDX-License-Identifier: MIT

//! The tunnel surface (§4.13): the kernel's responsibility here is only to
//! expose status and configuration to agents. The actual remote relay
//! transport is an explicitly out-of-scope "opaque collaborator" (§1) — a
//! real deployment wires a subprocess that injects remote syscalls tagged
//! with synthetic agent ids and drains connection events into the queue
//! this module owns. This build ships the surface without that subprocess:
//! `TUNNEL_CONNECT` always reports that no relay is wired in, but
//! `TUNNEL_STATUS`/`TUNNEL_CONFIG`/`TUNNEL_LIST_REMOTES` behave exactly as
//! they would against a real one, so SDKs and tests can be written against
//! the stable surface today.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use clove_core::AgentId;

/// Connection-event kinds the tunnel subprocess would push into the queue
/// the reactor drains each tick (§4.13, §5).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TunnelEvent {
    AgentConnected { remote_id: AgentId },
    AgentDisconnected { remote_id: AgentId },
    Disconnected,
    Reconnected,
    Error { message: String },
}

/// `TUNNEL_CONFIG` payload: where the relay lives and whether the surface
/// should report itself as enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TunnelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub relay_url: Option<String>,
}

/// `TUNNEL_STATUS` response body.
#[derive(Debug, Clone, Serialize)]
pub struct TunnelStatus {
    pub enabled: bool,
    pub connected: bool,
    pub relay_url: Option<String>,
    pub remote_count: usize,
}

/// One remote agent surfaced into the local id space by the tunnel (§4.13:
/// "Remote agent ids share the same space as local ones").
#[derive(Debug, Clone, Serialize)]
pub struct RemoteAgent {
    pub id: AgentId,
    pub connected_at_ms: u64,
}

/// The kernel-owned half of the tunnel: config, reported connection state,
/// and the remote-agent table. The event queue is `Mutex`-guarded per §5
/// because a real deployment's relay-reader helper thread pushes into it
/// concurrently with the reactor thread draining it every tick.
#[derive(Debug, Clone, Default)]
pub struct TunnelSurface {
    config: TunnelConfig,
    connected: bool,
    remotes: Vec<RemoteAgent>,
    events: Arc<Mutex<VecDeque<TunnelEvent>>>,
    /// Pending remote-syscall responses, keyed by the relay's correlation
    /// id, filled by the tunnel subprocess's reader thread and drained by
    /// the reactor (§4.13 "a concurrent event queue and a response map").
    responses: Arc<Mutex<HashMap<u64, Value>>>,
}

impl TunnelSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, config: TunnelConfig) {
        self.config = config;
    }

    pub fn status(&self) -> TunnelStatus {
        TunnelStatus {
            enabled: self.config.enabled,
            connected: self.connected,
            relay_url: self.config.relay_url.clone(),
            remote_count: self.remotes.len(),
        }
    }

    pub fn list_remotes(&self) -> Vec<RemoteAgent> {
        self.remotes.clone()
    }

    /// `TUNNEL_CONNECT`. No relay subprocess is wired into this build (§1
    /// Non-goals / Deliberately out of scope), so this always fails with a
    /// clear reason rather than silently pretending to connect.
    pub fn connect(&mut self) -> Result<(), String> {
        if !self.config.enabled {
            return Err("tunnel is disabled (set enabled via TUNNEL_CONFIG first)".to_string());
        }
        Err("no relay subprocess configured in this build".to_string())
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.remotes.clear();
    }

    /// Drain the connection-event queue. Called once per reactor tick
    /// (§4.13c / §5); a production relay's reader thread is the only other
    /// writer into `events`.
    pub fn drain_events(&self) -> Vec<TunnelEvent> {
        let mut queue = self.events.lock();
        queue.drain(..).collect()
    }

    /// Test/embedding seam a real relay integration would call from its
    /// reader thread.
    pub fn push_event(&self, event: TunnelEvent) {
        self.events.lock().push_back(event);
    }

    /// Record a remote-syscall response the relay's reader thread picked
    /// up, keyed by correlation id.
    pub fn store_response(&self, correlation_id: u64, body: Value) {
        self.responses.lock().insert(correlation_id, body);
    }

    /// Take a previously stored remote response, if the relay has delivered
    /// one yet.
    pub fn take_response(&self, correlation_id: u64) -> Option<Value> {
        self.responses.lock().remove(&correlation_id)
    }
}

#[cfg(test)]
#[path = "tunnel_tests.rs"]
mod tests;
