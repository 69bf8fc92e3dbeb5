// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Audit categories (§3). Each can be enabled/disabled independently via
/// `SET_AUDIT_CONFIG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    AgentLifecycle,
    Ipc,
    StateStore,
    Resource,
    Syscall,
    Network,
    World,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Security,
        Category::AgentLifecycle,
        Category::Ipc,
        Category::StateStore,
        Category::Resource,
        Category::Syscall,
        Category::Network,
        Category::World,
    ];
}

/// Which categories are currently logged, plus the ring buffer's retention
/// cap. Every category is enabled by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub security: bool,
    pub agent_lifecycle: bool,
    pub ipc: bool,
    pub state_store: bool,
    pub resource: bool,
    pub syscall: bool,
    pub network: bool,
    pub world: bool,
    #[serde(default = "super::audit_log::default_max_entries")]
    pub max_entries: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            security: true,
            agent_lifecycle: true,
            ipc: true,
            state_store: true,
            resource: true,
            syscall: true,
            network: true,
            world: true,
            max_entries: super::audit_log::default_max_entries(),
        }
    }
}

impl AuditConfig {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Security => self.security,
            Category::AgentLifecycle => self.agent_lifecycle,
            Category::Ipc => self.ipc,
            Category::StateStore => self.state_store,
            Category::Resource => self.resource,
            Category::Syscall => self.syscall,
            Category::Network => self.network,
            Category::World => self.world,
        }
    }
}
