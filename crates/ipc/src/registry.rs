// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use clove_core::AgentId;

use crate::error::IpcError;

/// A bijective `name <-> id` map over live agents (§4.8). `REGISTER`
/// succeeds if the name is free or already bound to the caller.
#[derive(Debug, Default)]
pub struct NameRegistry {
    by_name: HashMap<String, AgentId>,
    by_id: HashMap<AgentId, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: AgentId, name: String) -> Result<(), IpcError> {
        if let Some(&existing) = self.by_name.get(&name) {
            if existing != id {
                return Err(IpcError::NameTaken(name));
            }
            return Ok(());
        }
        // An agent may hold only one registered name at a time; registering
        // a new one releases the old binding.
        if let Some(old_name) = self.by_id.remove(&id) {
            self.by_name.remove(&old_name);
        }
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<AgentId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: AgentId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Release `id`'s binding (and its name), e.g. on disconnect.
    pub fn remove(&mut self, id: AgentId) {
        if let Some(name) = self.by_id.remove(&id) {
            self.by_name.remove(&name);
        }
    }

    pub fn all_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.by_id.keys().copied()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
