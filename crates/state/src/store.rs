// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use clove_core::{AgentId, Value};

use crate::entry::StateEntry;
use crate::error::StateError;
use crate::scope::Scope;

/// Which kind of mutation produced a [`crate::StateStore`] side effect,
/// carried in the `STATE_CHANGED` event payload (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOp {
    Store,
    Delete,
}

/// A successful `STORE`/`DELETE`, reported back to the caller (the kernel's
/// dispatcher) so it can emit `STATE_CHANGED` without this crate depending
/// on `clove-events` directly.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub key: String,
    pub scope: Scope,
    pub op: StateOp,
}

/// The flat keyspace backing `STORE`/`FETCH`/`DELETE`/`KEYS` (§4.9). Owned
/// exclusively by the kernel.
#[derive(Debug, Default)]
pub struct StateStore {
    entries: HashMap<String, StateEntry>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `STORE`. Always succeeds (scope has no write restriction beyond
    /// ownership of `Agent`-scoped keys already held by someone else, which
    /// the caller address as overwrite-by-owner only — see `store_scoped`).
    pub fn store(
        &mut self,
        caller: AgentId,
        key: String,
        value: Value,
        scope: Scope,
        ttl_ms: Option<u64>,
        now_ms: u64,
    ) -> Result<StateChange, StateError> {
        if let Some(existing) = self.entries.get(&key) {
            if !existing.is_expired(now_ms)
                && existing.scope == Scope::Agent
                && existing.owner_id != caller
            {
                return Err(StateError::NotOwner(key));
            }
        }
        let expires_at_ms = ttl_ms.map(|ttl| now_ms + ttl);
        self.entries.insert(
            key.clone(),
            StateEntry {
                key: key.clone(),
                value,
                owner_id: caller,
                scope,
                expires_at_ms,
            },
        );
        Ok(StateChange {
            key,
            scope,
            op: StateOp::Store,
        })
    }

    /// `FETCH`. Absent, expired, or scope-hidden keys all read as not-found
    /// (§4.9): the caller cannot distinguish "never existed" from "exists
    /// but you can't see it", by design — this avoids leaking key existence
    /// across agent boundaries.
    pub fn fetch(&mut self, caller: AgentId, key: &str, now_ms: u64) -> Result<Value, StateError> {
        self.purge_if_expired(key, now_ms);
        match self.entries.get(key) {
            Some(entry) if entry.visible_to(caller) => Ok(entry.value.clone()),
            _ => Err(StateError::NotFound),
        }
    }

    /// `DELETE`. Idempotent: deleting an absent or invisible key still
    /// succeeds (§4.9), but an `Agent`-scoped key owned by someone else is
    /// left untouched rather than silently removed.
    pub fn delete(&mut self, caller: AgentId, key: &str, now_ms: u64) -> StateChange {
        self.purge_if_expired(key, now_ms);
        let scope = match self.entries.get(key) {
            Some(entry) if entry.visible_to(caller) => {
                let scope = entry.scope;
                self.entries.remove(key);
                scope
            }
            Some(entry) => entry.scope,
            None => Scope::Agent,
        };
        StateChange {
            key: key.to_string(),
            scope,
            op: StateOp::Delete,
        }
    }

    /// `KEYS`. Only visible, non-expired keys with the optional prefix;
    /// `Agent`-scoped results are further restricted to keys the caller
    /// owns (§4.9: "`KEYS` lists only keys owned by the caller" for that
    /// scope).
    pub fn keys(&mut self, caller: AgentId, prefix: Option<&str>, now_ms: u64) -> Vec<String> {
        self.sweep(now_ms);
        let mut matches: Vec<String> = self
            .entries
            .values()
            .filter(|e| e.visible_to(caller))
            .filter(|e| prefix.map_or(true, |p| e.key.starts_with(p)))
            .map(|e| e.key.clone())
            .collect();
        matches.sort();
        matches
    }

    /// Remove every expired entry. Run periodically from the reactor tick
    /// (at least once a second per §4.9) in addition to the lazy per-access
    /// purge.
    pub fn sweep(&mut self, now_ms: u64) {
        self.entries.retain(|_, e| !e.is_expired(now_ms));
    }

    /// Remove every `Session`-scoped entry owned by `owner`, run when that
    /// agent's connection disconnects (DESIGN.md open question #2).
    pub fn purge_session(&mut self, owner: AgentId) {
        self.entries
            .retain(|_, e| !(e.scope == Scope::Session && e.owner_id == owner));
    }

    fn purge_if_expired(&mut self, key: &str, now_ms: u64) {
        if self.entries.get(key).is_some_and(|e| e.is_expired(now_ms)) {
            self.entries.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
