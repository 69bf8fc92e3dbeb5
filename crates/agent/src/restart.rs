// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// When a stopped agent with a saved configuration should be respawned
/// (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    Never,
    OnFailure,
    Always,
}

impl RestartPolicy {
    pub fn should_restart(self, exit_code: Option<i32>) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::OnFailure => exit_code.map(|code| code != 0).unwrap_or(true),
            RestartPolicy::Always => true,
        }
    }
}

/// Restart policy configuration supplied at `SPAWN` time and carried in the
/// agent's saved configuration for the lifetime of its restart window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartConfig {
    pub policy: RestartPolicy,
    pub max_restarts: u32,
    pub restart_window_sec: u64,
    pub backoff_initial_ms: u64,
    pub backoff_max_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            policy: RestartPolicy::Never,
            max_restarts: 3,
            restart_window_sec: 60,
            backoff_initial_ms: 1_000,
            backoff_max_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Per-agent restart bookkeeping, reset whenever the current time passes
/// `window_start_ms + restart_window_sec`.
#[derive(Debug, Clone, Default)]
pub struct RestartState {
    pub window_start_ms: u64,
    pub restart_count: u32,
    pub consecutive_failures: u32,
    pub escalated: bool,
}

impl RestartState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            window_start_ms: now_ms,
            restart_count: 0,
            consecutive_failures: 0,
            escalated: false,
        }
    }

    /// Reset the window (and, per §4.5, the counters with it) if `now_ms`
    /// has moved past the window's end. Returns `true` if a reset occurred.
    pub fn roll_window_if_expired(&mut self, now_ms: u64, restart_window_sec: u64) -> bool {
        if now_ms >= self.window_start_ms + restart_window_sec * 1_000 {
            self.window_start_ms = now_ms;
            self.restart_count = 0;
            self.consecutive_failures = 0;
            self.escalated = false;
            true
        } else {
            false
        }
    }

    /// `backoff = min(backoff_max_ms, backoff_initial_ms *
    /// backoff_multiplier ^ consecutive_failures)` (§4.5).
    pub fn next_backoff_ms(&self, config: &RestartConfig) -> u64 {
        let scaled = config.backoff_initial_ms as f64
            * config.backoff_multiplier.powi(self.consecutive_failures as i32);
        (scaled as u64).min(config.backoff_max_ms)
    }

    pub fn at_limit(&self, max_restarts: u32) -> bool {
        self.restart_count >= max_restarts
    }
}

/// A restart realized after its backoff elapses, queued by the reactor tick
/// and replayed through the spawn path (§4.5).
#[derive(Debug, Clone)]
pub struct PendingRestart {
    pub agent_name: Option<String>,
    pub due_at_ms: u64,
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
