// SPDX-License-Identifier: MIT

//! The socket server (§4.3): owns the listening fd and a map of client
//! connections, each with its own recv/send buffer. Accept is
//! edge-friendly (accept repeatedly until `EAGAIN`); reads drain into the
//! recv buffer and peel off as many complete frames as are available;
//! writes flush the send buffer with partial-write handling.

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::Arc;

use clove_core::{AgentId, AgentIdAllocator};
use clove_wire::{resync_skip, Frame};

use crate::error::KernelError;

/// One connected client: its server-assigned agent id and the buffers the
/// reactor's readable/writable callbacks drive (§4.3).
pub struct ClientConn {
    pub agent_id: AgentId,
    pub stream: UnixStream,
    recv_buf: Vec<u8>,
    send_buf: Vec<u8>,
    send_pos: usize,
}

impl ClientConn {
    pub fn wants_write(&self) -> bool {
        self.send_pos < self.send_buf.len()
    }
}

impl AsFd for ClientConn {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.stream.as_fd()
    }
}

/// Owns the listening socket and every live client connection, keyed by raw
/// fd — the "fd→handler map" the reactor's module doc refers to.
pub struct SocketServer {
    listener: UnixListener,
    pub clients: HashMap<RawFd, ClientConn>,
    ids: Arc<AgentIdAllocator>,
}

impl SocketServer {
    /// Bind a fresh non-blocking listener at `path`. The caller
    /// (`clove-kernel::pidfile`) is responsible for clearing a stale socket
    /// file first.
    pub fn bind(path: &Path, ids: Arc<AgentIdAllocator>) -> Result<Self, KernelError> {
        let listener = UnixListener::bind(path)
            .map_err(|e| KernelError::BindFailed(path.to_path_buf(), e))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| KernelError::BindFailed(path.to_path_buf(), e))?;
        Ok(Self {
            listener,
            clients: HashMap::new(),
            ids,
        })
    }

    pub fn listener_fd(&self) -> RawFd {
        self.listener.as_raw_fd()
    }

    /// Accept repeatedly until `EAGAIN` (§4.3 "edge-friendly"). Returns the
    /// fds of newly accepted clients so the caller can register them with
    /// the reactor.
    pub fn accept_ready(&mut self) -> Vec<RawFd> {
        let mut accepted = Vec::new();
        loop {
            match self.listener.accept() {
                Ok((stream, _addr)) => {
                    if stream.set_nonblocking(true).is_err() {
                        continue;
                    }
                    let fd = stream.as_raw_fd();
                    let agent_id = self.ids.next();
                    self.clients.insert(
                        fd,
                        ClientConn {
                            agent_id,
                            stream,
                            recv_buf: Vec::new(),
                            send_buf: Vec::new(),
                            send_pos: 0,
                        },
                    );
                    accepted.push(fd);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(_) => break,
            }
        }
        accepted
    }

    /// Drain `fd`'s socket into its recv buffer and peel off every complete
    /// frame available. Each frame's `agent_id` is overwritten with the
    /// server-assigned id before the dispatcher ever sees it (§4.3: "the
    /// dispatcher sees only kernel-trusted ids"). Returns the parsed frames
    /// plus whether the connection should be torn down (EOF/error).
    pub fn read_frames(&mut self, fd: RawFd) -> (Vec<Frame>, bool) {
        let Some(conn) = self.clients.get_mut(&fd) else {
            return (Vec::new(), true);
        };

        let mut chunk = [0u8; 64 * 1024];
        let mut should_close = false;
        loop {
            match conn.stream.read(&mut chunk) {
                Ok(0) => {
                    should_close = true;
                    break;
                }
                Ok(n) => conn.recv_buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(_) => {
                    should_close = true;
                    break;
                }
            }
        }

        let mut frames = Vec::new();
        loop {
            match Frame::decode(&conn.recv_buf) {
                Ok(Some((mut frame, consumed))) => {
                    conn.recv_buf.drain(..consumed);
                    frame.agent_id = conn.agent_id;
                    frames.push(frame);
                }
                Ok(None) => break,
                Err(_) => {
                    // Bad magic or oversize payload: resynchronize by
                    // discarding exactly one header's worth of bytes (§4.1).
                    let skip = resync_skip(&conn.recv_buf);
                    conn.recv_buf.drain(..skip);
                    if skip == 0 {
                        break;
                    }
                }
            }
        }

        (frames, should_close)
    }

    /// Append `frame`'s wire encoding to `fd`'s send buffer.
    pub fn queue_response(&mut self, fd: RawFd, frame: &Frame) {
        if let Some(conn) = self.clients.get_mut(&fd) {
            let _ = frame.encode(&mut conn.send_buf);
        }
    }

    /// Flush as much of `fd`'s send buffer as the socket accepts right now,
    /// handling partial writes. Returns whether the buffer still has
    /// unflushed bytes (i.e. whether write-readiness should stay armed) and
    /// whether the connection should be torn down on error.
    pub fn flush(&mut self, fd: RawFd) -> (bool, bool) {
        let Some(conn) = self.clients.get_mut(&fd) else {
            return (false, true);
        };
        loop {
            if conn.send_pos >= conn.send_buf.len() {
                conn.send_buf.clear();
                conn.send_pos = 0;
                return (false, false);
            }
            match conn.stream.write(&conn.send_buf[conn.send_pos..]) {
                Ok(0) => return (true, true),
                Ok(n) => conn.send_pos += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return (true, false),
                Err(_) => return (false, true),
            }
        }
    }

    pub fn remove(&mut self, fd: RawFd) -> Option<ClientConn> {
        self.clients.remove(&fd)
    }

    pub fn agent_id_of(&self, fd: RawFd) -> Option<AgentId> {
        self.clients.get(&fd).map(|c| c.agent_id)
    }
}

#[cfg(test)]
#[path = "socket_server_tests.rs"]
mod tests;
