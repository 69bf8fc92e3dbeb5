// SPDX-License-Identifier: MIT

use clove_core::{AgentId, Value};

use crate::scope::Scope;

/// `{key, value, owner_id, scope, expires_at?}` (§3). An entry with
/// `expires_at_ms` in the past is treated as absent and removed lazily on
/// access or proactively by [`crate::StateStore::sweep`].
#[derive(Debug, Clone)]
pub struct StateEntry {
    pub key: String,
    pub value: Value,
    pub owner_id: AgentId,
    pub scope: Scope,
    pub expires_at_ms: Option<u64>,
}

impl StateEntry {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms.is_some_and(|exp| now_ms >= exp)
    }

    /// Per §4.9: `Agent`-scoped entries are visible only to their owner;
    /// `Global`/`Session` are visible to anyone.
    pub fn visible_to(&self, caller: AgentId) -> bool {
        self.scope.is_world_readable() || self.owner_id == caller
    }
}
