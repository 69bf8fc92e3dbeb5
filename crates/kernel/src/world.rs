// SPDX-License-Identifier: MIT

//! The world-simulation registry (§1, §4's `WORLD_*` opcode group,
//! `0xA0..0xA8`): a pluggable layer invoked by syscall handlers. The spec
//! only fixes the dispatcher-facing interface — create/destroy/list/
//! join/leave/event/state/snapshot/restore — and leaves the actual
//! simulation (virtual filesystem, network mock, chaos injection) as an
//! opaque collaborator a real deployment plugs in behind this registry.
//! What ships here is the in-memory bookkeeping every backend needs
//! regardless of what it simulates: named worlds, membership, an
//! arbitrary JSON state blob per world, and snapshot/restore of that blob.

use std::collections::{HashMap, HashSet};

use clove_core::{AgentId, Value};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("world '{0}' already exists")]
    AlreadyExists(String),
    #[error("world '{0}' does not exist")]
    NotFound(String),
    #[error("agent is not a member of world '{0}'")]
    NotMember(String),
}

/// One simulated world: a membership set and an arbitrary state blob a
/// backend shapes however its simulation needs (filesystem tree, network
/// topology, chaos schedule, ...).
#[derive(Debug, Clone)]
struct World {
    members: HashSet<AgentId>,
    state: Value,
}

/// `WORLD_LIST` entry.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub name: String,
    pub member_count: usize,
}

#[derive(Debug, Default)]
pub struct WorldRegistry {
    worlds: HashMap<String, World>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: &str) -> Result<(), WorldError> {
        if self.worlds.contains_key(name) {
            return Err(WorldError::AlreadyExists(name.to_string()));
        }
        self.worlds.insert(
            name.to_string(),
            World {
                members: HashSet::new(),
                state: Value::Object(serde_json::Map::new()),
            },
        );
        Ok(())
    }

    pub fn destroy(&mut self, name: &str) -> Result<(), WorldError> {
        self.worlds
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| WorldError::NotFound(name.to_string()))
    }

    pub fn list(&self) -> Vec<WorldSummary> {
        let mut summaries: Vec<WorldSummary> = self
            .worlds
            .iter()
            .map(|(name, world)| WorldSummary {
                name: name.clone(),
                member_count: world.members.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    pub fn join(&mut self, name: &str, agent: AgentId) -> Result<(), WorldError> {
        let world = self
            .worlds
            .get_mut(name)
            .ok_or_else(|| WorldError::NotFound(name.to_string()))?;
        world.members.insert(agent);
        Ok(())
    }

    pub fn leave(&mut self, name: &str, agent: AgentId) -> Result<(), WorldError> {
        let world = self
            .worlds
            .get_mut(name)
            .ok_or_else(|| WorldError::NotFound(name.to_string()))?;
        world.members.remove(&agent);
        Ok(())
    }

    /// `WORLD_EVENT`: hand an event payload to the backend. No subscribers
    /// are modelled at this layer (the spec leaves event delivery to the
    /// plugged-in backend); this just validates the world exists and the
    /// caller is a member, which is all the dispatcher-facing contract
    /// requires.
    pub fn emit_event(&self, name: &str, agent: AgentId) -> Result<(), WorldError> {
        let world = self
            .worlds
            .get(name)
            .ok_or_else(|| WorldError::NotFound(name.to_string()))?;
        if !world.members.contains(&agent) {
            return Err(WorldError::NotMember(name.to_string()));
        }
        Ok(())
    }

    pub fn state(&self, name: &str) -> Result<Value, WorldError> {
        self.worlds
            .get(name)
            .map(|w| w.state.clone())
            .ok_or_else(|| WorldError::NotFound(name.to_string()))
    }

    pub fn set_state(&mut self, name: &str, state: Value) -> Result<(), WorldError> {
        let world = self
            .worlds
            .get_mut(name)
            .ok_or_else(|| WorldError::NotFound(name.to_string()))?;
        world.state = state;
        Ok(())
    }

    /// `WORLD_SNAPSHOT`: a point-in-time copy of the world's state blob,
    /// opaque to the registry and meaningful only to whatever backend wrote
    /// it.
    pub fn snapshot(&self, name: &str) -> Result<Value, WorldError> {
        self.state(name)
    }

    /// `WORLD_RESTORE`: replace the world's state blob with a previously
    /// captured snapshot. Membership is untouched.
    pub fn restore(&mut self, name: &str, snapshot: Value) -> Result<(), WorldError> {
        self.set_state(name, snapshot)
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
