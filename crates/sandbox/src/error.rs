// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to create cgroup directory {0}: {1}")]
    CgroupCreate(PathBuf, std::io::Error),

    #[error("failed to create synchronization pipe: {0}")]
    Pipe(#[source] nix::Error),

    #[error("clone failed: {0}")]
    Clone(#[source] nix::Error),

    #[error("fork failed: {0}")]
    Fork(#[source] nix::Error),

    #[error("exec of {0:?} failed: {1}")]
    Exec(Vec<String>, #[source] nix::Error),

    #[error("waitpid failed: {0}")]
    Wait(#[source] nix::Error),

    #[error("signal delivery failed: {0}")]
    Signal(#[source] nix::Error),
}
