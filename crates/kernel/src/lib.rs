// SPDX-License-Identifier: MIT

//! The kernel: reactor, socket server, syscall dispatcher, and every
//! opcode handler group (§4). This is the subsystem that ties every other
//! `clove-*` crate together behind one Unix-socket syscall interface.
//!
//! Requires raw signal-handling syscalls for graceful shutdown, so this
//! crate carries a local override of the workspace's `unsafe_code = "deny"`
//! lint (the sandbox crate sets the same precedent for its namespace/cgroup
//! syscalls).
#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
mod dispatcher;
mod error;
mod handlers;
mod kernel;
mod log_rotation;
mod pidfile;
mod reactor;
mod shutdown;
mod socket_server;
mod tunnel;
mod world;

pub use dispatcher::{handle_message, DispatchResult};
pub use error::KernelError;
pub use handlers::lifecycle::translate_lifecycle_event;
pub use kernel::Kernel;
pub use log_rotation::{rotate_log_if_needed, write_startup_marker, MAX_LOG_BYTES, MAX_LOG_ROTATIONS};
pub use pidfile::{acquire, InstanceGuard};
pub use reactor::{fd_token, Interest, Reactor, Readiness, TICK_MS};
pub use shutdown::{install as install_shutdown, ShutdownFlag};
pub use socket_server::SocketServer;
pub use tunnel::{RemoteAgent, TunnelConfig, TunnelEvent, TunnelStatus, TunnelSurface};
pub use world::{WorldError, WorldRegistry, WorldSummary};
