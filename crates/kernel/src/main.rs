// SPDX-License-Identifier: MIT

//! `cloved`: the kernel binary (§6 CLI surface). Binds the syscall socket,
//! runs the single-threaded reactor loop, and shuts down cleanly on
//! `SIGINT`/`SIGTERM`.
//!
//! Carries the same local `unsafe_code` override as `clove-kernel`'s lib
//! root (§ see `lib.rs`): borrowing the listener's raw fd back into an
//! `AsFd` wrapper is the one place this binary needs it.
#![allow(unsafe_code)]

use std::os::fd::RawFd;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use clove_core::AgentIdAllocator;
use clove_kernel::config::KernelConfig;
use clove_kernel::{
    handle_message, install_shutdown, rotate_log_if_needed, translate_lifecycle_event,
    write_startup_marker, Interest, Kernel, Reactor, SocketServer, MAX_LOG_BYTES,
    MAX_LOG_ROTATIONS, TICK_MS,
};

/// A local kernel for sandboxed AI agent processes.
#[derive(Parser, Debug)]
#[command(name = "cloved", version)]
struct Cli {
    /// Unix socket path. Defaults to `$CLOVE_SOCKET_PATH` or
    /// `/tmp/clove.sock` (§6).
    socket_path: Option<PathBuf>,
}

fn init_tracing(
    log_path: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_path {
        Some(path) => {
            // Rotate a log that's grown past the size threshold, then write
            // the startup marker, both before the subscriber is installed so
            // a crash during subscriber/reactor init is still visible in the
            // file (§12).
            rotate_log_if_needed(path, MAX_LOG_BYTES, MAX_LOG_ROTATIONS);
            write_startup_marker(path);

            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("cloved.log"));
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = KernelConfig::load(cli.socket_path);
    let _log_guard = init_tracing(config.log_path.as_deref());

    std::process::exit(match run(config) {
        Ok(()) => 0,
        Err(e) => {
            error!("cloved failed to start: {e}");
            1
        }
    });
}

fn run(config: KernelConfig) -> Result<(), clove_kernel::KernelError> {
    let _instance_guard = clove_kernel::acquire(&config.socket_path, &config.pid_marker_path())?;
    let shutdown = install_shutdown()?;

    let ids = Arc::new(AgentIdAllocator::new());
    let mut server = SocketServer::bind(&config.socket_path, Arc::clone(&ids))?;
    let mut reactor = Reactor::new()?;
    let mut kernel = Kernel::new(&config, ids);

    let listener_fd = server.listener_fd();
    reactor.add(unix_listener_fd(&server), listener_fd as u64, Interest::READABLE)?;

    info!(socket = %config.socket_path.display(), "cloved listening");

    'outer: loop {
        if shutdown.is_set() {
            break;
        }

        let readiness = reactor.poll(TICK_MS)?;
        for (token, ready) in readiness {
            let fd = token as RawFd;

            if fd == listener_fd {
                for new_fd in server.accept_ready() {
                    let Some(conn) = server.clients.get(&new_fd) else {
                        continue;
                    };
                    if let Err(e) = reactor.add(conn, new_fd as u64, Interest::READABLE) {
                        warn!("failed to register new client fd {new_fd}: {e}");
                    }
                }
                continue;
            }

            if ready.hangup || ready.error {
                close_client(&mut server, &mut reactor, fd, &mut kernel);
                continue;
            }

            let mut close_after = false;

            if ready.readable {
                let (frames, should_close) = server.read_frames(fd);
                close_after = should_close;
                if let Some(agent_id) = server.agent_id_of(fd) {
                    for frame in frames {
                        let result =
                            handle_message(&mut kernel, agent_id, frame.opcode, &frame.payload);
                        let response = clove_wire::Frame {
                            agent_id,
                            opcode: frame.opcode,
                            payload: result.payload,
                        };
                        server.queue_response(fd, &response);
                        if result.close_connection {
                            close_after = true;
                        }
                    }
                }
            }

            if !close_after {
                let (wants_write, write_error) = server.flush(fd);
                if write_error {
                    close_after = true;
                } else if let Some(conn) = server.clients.get(&fd) {
                    let interest = if wants_write {
                        Interest::READABLE_WRITABLE
                    } else {
                        Interest::READABLE
                    };
                    if let Err(e) = reactor.modify(conn, fd as u64, interest) {
                        warn!("failed to rearm fd {fd}: {e}");
                    }
                }
            }

            if close_after {
                close_client(&mut server, &mut reactor, fd, &mut kernel);
            }

            if shutdown.is_set() {
                break 'outer;
            }
        }

        for event in kernel.tick() {
            translate_lifecycle_event(&mut kernel, event);
        }

        for tunnel_event in kernel.tunnel.drain_events() {
            info!(?tunnel_event, "tunnel event");
        }
    }

    info!("shutdown requested, stopping live agents");
    graceful_shutdown(&mut kernel);
    let _ = std::fs::remove_file(&config.socket_path);
    info!("cloved exiting cleanly");
    Ok(())
}

/// Stop every live agent within `stop_timeout`, escalating to `SIGKILL` as
/// `AgentManager::stop` already does per agent (§4.5, §6 "drain in-flight
/// requests... then terminate outstanding agent processes").
fn graceful_shutdown<A: clove_agent::AgentAdapter, C: clove_core::Clock>(
    kernel: &mut Kernel<A, C>,
) {
    let timeout = kernel.stop_timeout;
    let live: Vec<_> = kernel
        .agents
        .list()
        .into_iter()
        .filter(|a| a.running)
        .map(|a| a.id)
        .collect();
    for id in live {
        if let Err(e) = kernel.agents.stop(id, timeout) {
            warn!("failed to stop agent {id:?} during shutdown: {e}");
        }
    }
}

fn close_client<A: clove_agent::AgentAdapter, C: clove_core::Clock>(
    server: &mut SocketServer,
    reactor: &mut Reactor,
    fd: RawFd,
    kernel: &mut Kernel<A, C>,
) {
    if let Some(conn) = server.remove(fd) {
        let _ = reactor.remove(&conn);
        kernel.purge_agent(conn.agent_id);
    }
}

/// The listener itself never changes identity for the life of the process,
/// so a throwaway wrapper borrowing its raw fd is enough to register it
/// with the reactor without `SocketServer` exposing the `UnixListener`.
struct ListenerFd(RawFd);

impl std::os::fd::AsFd for ListenerFd {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        unsafe { std::os::fd::BorrowedFd::borrow_raw(self.0) }
    }
}

fn unix_listener_fd(server: &SocketServer) -> ListenerFd {
    ListenerFd(server.listener_fd())
}
