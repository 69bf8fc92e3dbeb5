// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Resource limits requested for a sandbox's cgroup v2 controllers. Every
/// field is optional: an absent limit is simply never written, and its
/// corresponding `*_limit_applied` flag in [`crate::IsolationStatus`] stays
/// `false` without that counting as degradation (nothing was requested).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceLimits {
    pub memory_bytes: Option<u64>,
    /// CPU quota in microseconds per `cpu_period_us`. `None` means no quota.
    pub cpu_quota_us: Option<u64>,
    #[serde(default = "default_cpu_period_us")]
    pub cpu_period_us: u64,
    /// Shares-style weight (1-1024, cgroup v1 convention); mapped to the
    /// cgroup v2 `cpu.weight` range (1-10000) via
    /// `weight = clamp(shares * 100 / 1024, 1, 10000)`.
    pub cpu_shares: Option<u32>,
    pub max_pids: Option<u32>,
}

fn default_cpu_period_us() -> u64 {
    100_000
}

impl ResourceLimits {
    /// Map a cgroup-v1-style shares value onto the cgroup v2 `cpu.weight`
    /// range, per §4.6: `clamp(shares * 100 / 1024, 1, 10000)`.
    pub fn cpu_weight(&self) -> Option<u32> {
        self.cpu_shares.map(|shares| {
            let scaled = (shares as u64 * 100) / 1024;
            scaled.clamp(1, 10_000) as u32
        })
    }
}

/// Namespaces and cgroup limits an agent's sandbox should attempt to apply.
/// `enable_network = false` requests a network namespace in addition to PID,
/// mount, and UTS, which are always requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SandboxConfig {
    pub sandbox_name: String,
    #[serde(default = "default_true")]
    pub enable_network: bool,
    #[serde(default)]
    pub limits: ResourceLimits,
    #[serde(default = "default_cgroup_root")]
    pub cgroup_root: PathBuf,
    /// When `true`, skip the privileged clone path entirely and go straight
    /// to the degraded fork+exec path — the caller has explicitly asked for
    /// an unsandboxed agent (`SPAWN {sandboxed: false}`), as opposed to the
    /// kernel lacking `CAP_SYS_ADMIN`.
    #[serde(default)]
    pub force_unisolated: bool,
}

fn default_true() -> bool {
    true
}

fn default_cgroup_root() -> PathBuf {
    PathBuf::from("/sys/fs/cgroup/clove")
}

impl SandboxConfig {
    pub fn new(sandbox_name: impl Into<String>) -> Self {
        Self {
            sandbox_name: sandbox_name.into(),
            enable_network: true,
            limits: ResourceLimits::default(),
            cgroup_root: default_cgroup_root(),
            force_unisolated: false,
        }
    }

    pub fn cgroup_path(&self) -> PathBuf {
        self.cgroup_root.join(&self.sandbox_name)
    }
}
