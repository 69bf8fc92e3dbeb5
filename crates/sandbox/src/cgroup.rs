// SPDX-License-Identifier: MIT

//! Best-effort cgroup v2 setup. Each individual limit write is independent:
//! a missing controller file (common in containers/CI, or when the cgroup
//! delegate doesn't expose a controller) degrades only that one limit
//! rather than failing the whole sandbox — see §4.6 step 1.

use std::path::{Path, PathBuf};

use nix::unistd::Pid;

use crate::config::ResourceLimits;
use crate::error::SandboxError;

/// Create the cgroup directory for this sandbox. Returns the path on
/// success; a failure here (e.g. `/sys/fs/cgroup` not writable) is still
/// surfaced as an error since without even a directory there is nowhere to
/// write limits at all, but callers treat it as a degradation trigger
/// rather than a fatal spawn error.
pub fn create(path: &Path) -> Result<(), SandboxError> {
    std::fs::create_dir_all(path).map_err(|e| SandboxError::CgroupCreate(path.to_path_buf(), e))
}

/// Write `memory.max`. Returns whether the write succeeded.
pub fn apply_memory_limit(cgroup: &Path, bytes: u64) -> bool {
    write_best_effort(&cgroup.join("memory.max"), &bytes.to_string())
}

/// Write `cpu.max` as `"<quota> <period>"` and `cpu.weight` if a weight was
/// derived from shares. Returns whether the quota/period write succeeded
/// (weight is tracked as part of the same "cpu limit applied" flag per the
/// spec's single `cpu_limit_applied`-style bookkeeping).
pub fn apply_cpu_limit(cgroup: &Path, limits: &ResourceLimits) -> bool {
    let mut ok = true;
    if let Some(quota) = limits.cpu_quota_us {
        let value = format!("{quota} {}", limits.cpu_period_us);
        ok &= write_best_effort(&cgroup.join("cpu.max"), &value);
    }
    if let Some(weight) = limits.cpu_weight() {
        ok &= write_best_effort(&cgroup.join("cpu.weight"), &weight.to_string());
    }
    ok
}

/// Write `pids.max`. Returns whether the write succeeded.
pub fn apply_pids_limit(cgroup: &Path, max_pids: u32) -> bool {
    write_best_effort(&cgroup.join("pids.max"), &max_pids.to_string())
}

/// Move `pid` into the cgroup by writing to `cgroup.procs`. A failure here
/// invalidates every previously-applied limit (§4.6 step 4): the process
/// never actually joined the cgroup, so none of the limits govern it.
pub fn attach_process(cgroup: &Path, pid: Pid) -> bool {
    write_best_effort(&cgroup.join("cgroup.procs"), &pid.as_raw().to_string())
}

/// Remove the cgroup directory. Best-effort: busy files or permission
/// errors are logged and swallowed (§4.6 Teardown).
pub fn remove(cgroup: &Path) {
    if let Err(e) = std::fs::remove_dir(cgroup) {
        tracing::warn!(path = %cgroup.display(), error = %e, "failed to remove cgroup directory");
    }
}

fn write_best_effort(file: &Path, value: &str) -> bool {
    match std::fs::write(file, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %file.display(), error = %e, "cgroup controller write failed, degrading this limit");
            false
        }
    }
}

pub fn default_root() -> PathBuf {
    PathBuf::from("/sys/fs/cgroup/clove")
}
