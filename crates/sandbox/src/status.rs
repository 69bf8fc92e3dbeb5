// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// What isolation was actually applied, as opposed to what was requested.
/// Invariant (§3): if `fully_isolated` is `true`, every requested namespace
/// flag and every requested cgroup controller succeeded; otherwise
/// `degraded_reason` is non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IsolationStatus {
    pub pid_ns: bool,
    pub mount_ns: bool,
    pub uts_ns: bool,
    pub net_ns: bool,
    pub memory_limit_applied: bool,
    pub cpu_limit_applied: bool,
    pub pids_limit_applied: bool,
    pub fully_isolated: bool,
    pub degraded_reason: Option<String>,
}

impl IsolationStatus {
    /// Recompute `fully_isolated` from the individual flags against what was
    /// requested, setting `degraded_reason` when anything requested did not
    /// succeed and leaving any reason already set by the caller (e.g. a
    /// clone() failure that forced the degraded fork+exec path) untouched.
    pub fn finalize(mut self, requested: &Requested) -> Self {
        let mut missing = Vec::new();
        if requested.pid_ns && !self.pid_ns {
            missing.push("pid namespace");
        }
        if requested.mount_ns && !self.mount_ns {
            missing.push("mount namespace");
        }
        if requested.uts_ns && !self.uts_ns {
            missing.push("uts namespace");
        }
        if requested.net_ns && !self.net_ns {
            missing.push("network namespace");
        }
        if requested.memory_limit && !self.memory_limit_applied {
            missing.push("memory.max");
        }
        if requested.cpu_limit && !self.cpu_limit_applied {
            missing.push("cpu.max/cpu.weight");
        }
        if requested.pids_limit && !self.pids_limit_applied {
            missing.push("pids.max");
        }

        if missing.is_empty() && self.degraded_reason.is_none() {
            self.fully_isolated = true;
        } else {
            self.fully_isolated = false;
            if self.degraded_reason.is_none() {
                self.degraded_reason = Some(format!("not applied: {}", missing.join(", ")));
            }
        }
        self
    }
}

/// Which namespaces/controllers the caller actually asked for, derived from
/// a [`crate::SandboxConfig`]. Kept separate from the config so
/// `IsolationStatus::finalize` doesn't need to know about
/// `has_cap_sys_admin` or the degraded-path short-circuit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Requested {
    pub pid_ns: bool,
    pub mount_ns: bool,
    pub uts_ns: bool,
    pub net_ns: bool,
    pub memory_limit: bool,
    pub cpu_limit: bool,
    pub pids_limit: bool,
}
