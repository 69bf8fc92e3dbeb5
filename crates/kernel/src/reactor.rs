// SPDX-License-Identifier: MIT

//! The readiness-polling event loop (§4.2): a thin wrapper over Linux
//! `epoll`. `clove-kernel` is otherwise single-threaded, so the reactor owns
//! no handler closures of its own — `Kernel::run` owns the fd→handler map
//! (which fd is the listener vs. a client, held as a `HashMap<RawFd, _>` in
//! [`crate::socket_server::SocketServer`]) and calls back into itself once
//! per ready descriptor after `poll` returns.

use std::os::fd::{AsFd, AsRawFd, RawFd};

use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags, EpollTimeout};

use crate::error::KernelError;

/// Which of the two readiness conditions a registration cares about.
/// Hangup and error are always reported regardless of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    pub readable: bool,
    pub writable: bool,
}

impl Interest {
    pub const READABLE: Interest = Interest {
        readable: true,
        writable: false,
    };
    pub const READABLE_WRITABLE: Interest = Interest {
        readable: true,
        writable: true,
    };

    fn to_flags(self) -> EpollFlags {
        let mut flags = EpollFlags::EPOLLHUP | EpollFlags::EPOLLERR;
        if self.readable {
            flags |= EpollFlags::EPOLLIN;
        }
        if self.writable {
            flags |= EpollFlags::EPOLLOUT;
        }
        flags
    }
}

/// The readiness mask observed for one fd after a `poll` (§4.2: "dispatch
/// each ready fd to its handler with the observed event mask").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
    pub hangup: bool,
    pub error: bool,
}

impl Readiness {
    fn from_flags(flags: EpollFlags) -> Self {
        Self {
            readable: flags.contains(EpollFlags::EPOLLIN),
            writable: flags.contains(EpollFlags::EPOLLOUT),
            hangup: flags.intersects(EpollFlags::EPOLLHUP | EpollFlags::EPOLLRDHUP),
            error: flags.contains(EpollFlags::EPOLLERR),
        }
    }
}

/// The 100ms maintenance tick (§4.2): "`run()` — call `poll(100ms)` in a
/// loop... between polls, perform periodic maintenance." Also the bound on
/// shutdown responsiveness.
pub const TICK_MS: u16 = 100;

/// Readiness-based event loop over `epoll`. `add`/`modify`/`remove` mirror
/// §4.2's contract directly; `poll` is the one blocking call the reactor
/// thread ever makes (§5 Suspension points). Registrations are keyed by a
/// caller-chosen `u64` token (in practice the fd's own number) rather than
/// a `RawFd` directly, so `Kernel::run`'s client map is the single source of
/// truth for "what does this descriptor mean" and the reactor never needs
/// to resurrect a borrowed fd from a bare integer.
pub struct Reactor {
    epoll: Epoll,
    event_buf: Vec<EpollEvent>,
}

impl Reactor {
    pub fn new() -> Result<Self, KernelError> {
        let epoll = Epoll::new(EpollCreateFlags::empty()).map_err(KernelError::EpollCreate)?;
        Ok(Self {
            epoll,
            event_buf: vec![EpollEvent::empty(); 1024],
        })
    }

    pub fn add(&self, fd: impl AsFd, token: u64, interest: Interest) -> Result<(), KernelError> {
        let event = EpollEvent::new(interest.to_flags(), token);
        self.epoll.add(fd, event).map_err(KernelError::EpollCtl)
    }

    pub fn modify(&self, fd: impl AsFd, token: u64, interest: Interest) -> Result<(), KernelError> {
        let mut event = EpollEvent::new(interest.to_flags(), token);
        self.epoll
            .modify(fd, &mut event)
            .map_err(KernelError::EpollCtl)
    }

    pub fn remove(&self, fd: impl AsFd) -> Result<(), KernelError> {
        self.epoll.delete(fd).map_err(KernelError::EpollCtl)
    }

    /// Wait up to `timeout_ms`, returning the ready `(token, Readiness)`
    /// pairs. A fatal `epoll_wait` failure (§4.2: "-1 on fatal error")
    /// surfaces as `Err`; a plain empty result is the ordinary "nothing
    /// ready before the tick elapsed" case.
    pub fn poll(&mut self, timeout_ms: u16) -> Result<Vec<(u64, Readiness)>, KernelError> {
        let timeout = EpollTimeout::from(timeout_ms);
        let n = self
            .epoll
            .wait(&mut self.event_buf, timeout)
            .map_err(KernelError::EpollWait)?;
        Ok(self.event_buf[..n]
            .iter()
            .map(|ev| (ev.data(), Readiness::from_flags(ev.events())))
            .collect())
    }
}

/// Convenience: the token this workspace uses everywhere is just the raw fd
/// number, so registrations and the client map agree on identity for free.
pub fn fd_token(owner: &impl AsFd) -> RawFd {
    owner.as_fd().as_raw_fd()
}

#[cfg(test)]
#[path = "reactor_tests.rs"]
mod tests;
