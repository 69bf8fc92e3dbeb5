// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use clove_core::AgentId;

use crate::error::PermissionError;
use crate::preset::PermissionPreset;
use crate::record::PermissionRecord;

/// One record per agent that has ever been checked or configured. Owned by
/// the kernel; the dispatcher consults it on every gated opcode.
#[derive(Debug, Default)]
pub struct PermissionTable {
    records: HashMap<AgentId, PermissionRecord>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an agent's record, creating one from [`PermissionPreset::Standard`]
    /// if this is the first check for that agent.
    pub fn get_or_create(&mut self, agent_id: AgentId) -> &PermissionRecord {
        self.records
            .entry(agent_id)
            .or_insert_with(|| PermissionPreset::default().to_record())
    }

    pub fn get(&self, agent_id: AgentId) -> Option<&PermissionRecord> {
        self.records.get(&agent_id)
    }

    /// Apply `SET_PERMS`. `caller` may always set its own record; setting
    /// another agent's record requires `caller`'s existing record (created
    /// on demand) to have `can_spawn`.
    pub fn set(
        &mut self,
        caller: AgentId,
        target: AgentId,
        record: PermissionRecord,
    ) -> Result<(), PermissionError> {
        if caller != target {
            let caller_record = self.get_or_create(caller);
            if !caller_record.can_spawn {
                return Err(PermissionError::ElevationRequired {
                    agent_id: caller.0,
                });
            }
        }
        self.records.insert(target, record);
        Ok(())
    }

    pub fn set_preset(
        &mut self,
        caller: AgentId,
        target: AgentId,
        preset: PermissionPreset,
    ) -> Result<(), PermissionError> {
        self.set(caller, target, preset.to_record())
    }

    /// Record successful LLM usage against `agent_id`'s record, creating one
    /// first if needed (the permission check that gates `THINK` will always
    /// have created it already, but this stays safe standalone).
    pub fn record_llm_usage(&mut self, agent_id: AgentId, tokens: u64) {
        self.get_or_create(agent_id);
        if let Some(record) = self.records.get_mut(&agent_id) {
            record.record_llm_usage(tokens);
        }
    }

    pub fn remove(&mut self, agent_id: AgentId) {
        self.records.remove(&agent_id);
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
