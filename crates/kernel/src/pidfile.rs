// SPDX-License-Identifier: MIT

//! Single-instance guard (§12, supplemented). The authoritative check is
//! socket liveness: "if a stale socket file exists and nothing is listening
//! on it, it is removed and recreated; if something answers on it, startup
//! fails with a clear error instead of silently stealing the path." A pid
//! marker file next to the socket, advisory-locked the way the teacher locks
//! its daemon pid file (`daemon/src/lifecycle/startup.rs`), backs that up for
//! the narrow race where two kernels probe the socket before either has
//! bound it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;

use fs2::FileExt;

use crate::error::KernelError;

/// Holds the kernel's claim on its runtime paths for the life of the
/// process. Dropping it releases the advisory lock; the socket itself is
/// removed separately on clean shutdown.
pub struct InstanceGuard {
    _pid_lock: File,
}

/// Probe the socket, then take the advisory pid lock. Removes a stale
/// socket file in place so the caller can bind fresh.
pub fn acquire(socket_path: &Path, pid_marker_path: &Path) -> Result<InstanceGuard, KernelError> {
    if socket_path.exists() {
        match UnixStream::connect(socket_path) {
            Ok(_) => return Err(KernelError::AlreadyRunning(socket_path.to_path_buf())),
            Err(_) => {
                std::fs::remove_file(socket_path)
                    .map_err(|e| KernelError::StaleSocketRemoval(socket_path.to_path_buf(), e))?;
            }
        }
    }

    let mut pid_lock = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(pid_marker_path)
        .map_err(|e| KernelError::PidFile(pid_marker_path.to_path_buf(), e))?;

    pid_lock
        .try_lock_exclusive()
        .map_err(|_| KernelError::AlreadyRunning(pid_marker_path.to_path_buf()))?;

    pid_lock
        .set_len(0)
        .and_then(|_| write!(pid_lock, "{}", std::process::id()))
        .map_err(|e| KernelError::PidFile(pid_marker_path.to_path_buf(), e))?;

    Ok(InstanceGuard { _pid_lock: pid_lock })
}

#[cfg(test)]
#[path = "pidfile_tests.rs"]
mod tests;
