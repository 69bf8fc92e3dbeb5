// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

/// Fatal kernel errors (§7): reactor init, socket bind, single-instance
/// lock, epoll failure. These abort startup; `main` reports them and exits
/// non-zero. They never surface to a connected client.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("failed to create epoll instance: {0}")]
    EpollCreate(#[source] nix::Error),

    #[error("epoll_ctl failed: {0}")]
    EpollCtl(#[source] nix::Error),

    #[error("epoll_wait failed: {0}")]
    EpollWait(#[source] nix::Error),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("failed to remove stale socket at {0}: {1}")]
    StaleSocketRemoval(PathBuf, std::io::Error),

    #[error("another kernel instance is already running (pid file locked at {0})")]
    AlreadyRunning(PathBuf),

    #[error("failed to acquire pid file {0}: {1}")]
    PidFile(PathBuf, std::io::Error),

    #[error("could not resolve a runtime directory: {0}")]
    NoRuntimeDir(String),

    #[error("failed to install signal handler: {0}")]
    SignalInstall(#[source] nix::Error),
}
