// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::cgroup;
use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::process::{self, LaunchSpec};
use crate::status::{IsolationStatus, Requested};

/// A running (or exited) agent process and its isolation envelope. 1:1 with
/// an agent while it runs (§3).
#[derive(Debug)]
pub struct Sandbox {
    pub pid: Pid,
    pub cgroup_path: Option<PathBuf>,
    pub status: IsolationStatus,
    pub exit_code: Option<i32>,
}

impl Sandbox {
    /// Create the sandbox's cgroup (best-effort), launch the target command
    /// under it, and report the isolation actually achieved. Never fails
    /// because isolation was merely degraded — only hard spawn failures
    /// (pipe creation, both clone and fork failing) return `Err`.
    pub fn spawn(config: &SandboxConfig, spec: &LaunchSpec) -> Result<Self, SandboxError> {
        let limits = &config.limits;
        let requested = Requested {
            pid_ns: true,
            mount_ns: true,
            uts_ns: true,
            net_ns: !config.enable_network,
            memory_limit: limits.memory_bytes.is_some(),
            cpu_limit: limits.cpu_quota_us.is_some() || limits.cpu_shares.is_some(),
            pids_limit: limits.max_pids.is_some(),
        };

        let cgroup_path = config.cgroup_path();
        let cgroup_created = cgroup::create(&cgroup_path).is_ok();

        let mut status = IsolationStatus::default();
        if cgroup_created {
            if let Some(bytes) = limits.memory_bytes {
                status.memory_limit_applied = cgroup::apply_memory_limit(&cgroup_path, bytes);
            }
            if requested.cpu_limit {
                status.cpu_limit_applied = cgroup::apply_cpu_limit(&cgroup_path, limits);
            }
            if let Some(max_pids) = limits.max_pids {
                status.pids_limit_applied = cgroup::apply_pids_limit(&cgroup_path, max_pids);
            }
        } else {
            status.degraded_reason = Some(format!(
                "could not create cgroup directory {}",
                cgroup_path.display()
            ));
        }

        let (sync_read, sync_write) = process::sync_pipe()?;

        let launched = if config.force_unisolated {
            status.degraded_reason =
                Some("sandboxed=false: agent explicitly opted out of OS isolation".to_string());
            process::fork_spawn(spec, sync_read)?
        } else {
            match process::clone_spawn(spec, &config.sandbox_name, requested.net_ns, sync_read) {
                Ok(launched) => launched,
                Err(e) => {
                    tracing::warn!(
                        sandbox = %config.sandbox_name,
                        error = %e,
                        "privileged clone failed, falling back to unisolated fork+exec"
                    );
                    let launched = process::fork_spawn(spec, sync_read)?;
                    status.degraded_reason = Some(format!(
                        "namespace clone unavailable ({e}); running without OS isolation"
                    ));
                    launched
                }
            }
        };

        status.pid_ns = launched.pid_ns;
        status.mount_ns = launched.mount_ns;
        status.uts_ns = launched.uts_ns;
        status.net_ns = launched.net_ns;

        let cgroup_path = if cgroup_created {
            if cgroup::attach_process(&cgroup_path, launched.pid) {
                Some(cgroup_path)
            } else {
                // §4.6 step 4: a failed cgroup.procs write invalidates every
                // previously-applied limit, since the process never
                // actually joined the cgroup.
                status.memory_limit_applied = false;
                status.cpu_limit_applied = false;
                status.pids_limit_applied = false;
                Some(cgroup_path)
            }
        } else {
            None
        };

        process::release(sync_write);

        let status = status.finalize(&requested);

        Ok(Self {
            pid: launched.pid,
            cgroup_path,
            status,
            exit_code: None,
        })
    }

    /// Non-blocking liveness probe. Returns `false` once the process has
    /// been reaped, caching its exit code as a side effect. Safe to call
    /// from the reactor tick (§4.6 Liveness).
    pub fn is_running(&mut self) -> bool {
        if self.exit_code.is_some() {
            return false;
        }
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => true,
            Ok(WaitStatus::Exited(_, code)) => {
                self.exit_code = Some(code);
                false
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                self.exit_code = Some(128 + sig as i32);
                false
            }
            Ok(_) => true,
            Err(_) => {
                // ECHILD or similar: treat as already reaped elsewhere.
                self.exit_code.get_or_insert(-1);
                false
            }
        }
    }

    pub fn send_signal(&self, signal: Signal) -> Result<(), SandboxError> {
        process::signal(self.pid, signal)
    }

    /// Remove the cgroup directory. Best-effort, logged and swallowed on
    /// failure (§4.6 Teardown).
    pub fn teardown(&self) {
        if let Some(path) = &self.cgroup_path {
            cgroup::remove(path);
        }
    }
}

#[cfg(test)]
#[path = "sandbox_tests.rs"]
mod tests;
