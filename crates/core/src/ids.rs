// SPDX-License-Identifier: MIT

//! Agent identifiers.
//!
//! `AgentId` is kernel-assigned on accept and never reused within a kernel
//! lifetime: `0` is reserved to mean "the kernel itself" (used as the source
//! id of kernel-emitted events and as the parent id of kernel-spawned
//! agents).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Unique identifier for an agent, assigned monotonically on accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Sentinel meaning "the kernel", used as a source id for kernel-emitted
    /// events and as the parent id of kernel-spawned (top-level) agents.
    pub const KERNEL: AgentId = AgentId(0);

    pub fn is_kernel(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Allocates strictly increasing agent ids, starting at 1 so `0` stays
/// reserved for [`AgentId::KERNEL`].
#[derive(Debug, Default)]
pub struct AgentIdAllocator {
    next: AtomicU32,
}

impl AgentIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Returns the next id. Ids are never reused while the allocator lives,
    /// even after the agent holding a given id is reaped.
    pub fn next(&self) -> AgentId {
        AgentId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
