// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Visibility rule for a [`crate::StateEntry`] (§3, §4.9).
///
/// `Global` and `Session` are functionally identical for access control —
/// any agent may read/write/delete/list either. The distinction is
/// lifecycle, not access (DESIGN.md open question #2): `Session` entries are
/// also purged when the owning connection disconnects, while `Global`
/// entries persist for the kernel's lifetime regardless of any single
/// agent's connection state. Both are wiped on kernel exit either way, since
/// the store keeps no persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Agent,
    Global,
    Session,
}

impl Scope {
    pub fn is_world_readable(self) -> bool {
        matches!(self, Scope::Global | Scope::Session)
    }
}
