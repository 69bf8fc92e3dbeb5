// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::record::PermissionRecord;

/// Paths blocked by every preset except `Unrestricted`.
pub const DEFAULT_BLOCKED_PATHS: &[&str] = &[
    "/etc/shadow",
    "/etc/passwd",
    "~/.ssh/*",
    "~/.gnupg/*",
    "~/.aws/*",
    "~/.config/gcloud/*",
    "*/.env",
    "*/.git/config",
    "*/credentials*",
    "*/secrets*",
    "*/*token*",
    "*/*password*",
];

/// Commands blocked by every preset except `Unrestricted`.
pub const DEFAULT_BLOCKED_COMMANDS: &[&str] = &[
    "rm -rf /",
    "rm -rf ~",
    "rm -rf /*",
    "sudo",
    "su ",
    "chmod 777",
    "curl | bash",
    "wget | bash",
    "> /dev/sd",
    "dd if=",
    "mkfs",
    ":(){:|:&};:",
    "shutdown",
    "reboot",
    "init 0",
    "poweroff",
];

fn default_blocked_paths() -> Vec<String> {
    DEFAULT_BLOCKED_PATHS.iter().map(|s| s.to_string()).collect()
}

fn default_blocked_commands() -> Vec<String> {
    DEFAULT_BLOCKED_COMMANDS.iter().map(|s| s.to_string()).collect()
}

/// A named starting point for a [`PermissionRecord`], from the most
/// permissive to the most restrictive. `SET_PERMS` accepts either a preset
/// name or a full record; presets are just sugar for a record literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPreset {
    Unrestricted,
    Standard,
    Sandboxed,
    ReadOnly,
    Minimal,
}

impl PermissionPreset {
    pub fn to_record(self) -> PermissionRecord {
        match self {
            PermissionPreset::Unrestricted => PermissionRecord {
                can_exec: true,
                can_read: true,
                can_write: true,
                can_think: true,
                can_spawn: true,
                can_http: true,
                allowed_read_paths: Vec::new(),
                allowed_write_paths: Vec::new(),
                blocked_paths: Vec::new(),
                allowed_commands: Vec::new(),
                blocked_commands: Vec::new(),
                allowed_domains: vec!["*".to_string()],
                max_llm_calls: 0,
                max_llm_tokens: 0,
                llm_calls_made: 0,
                llm_tokens_used: 0,
            },
            PermissionPreset::Standard => PermissionRecord {
                can_exec: true,
                can_read: true,
                can_write: true,
                can_think: true,
                can_spawn: false,
                can_http: false,
                allowed_read_paths: Vec::new(),
                allowed_write_paths: Vec::new(),
                blocked_paths: default_blocked_paths(),
                allowed_commands: Vec::new(),
                blocked_commands: default_blocked_commands(),
                allowed_domains: Vec::new(),
                max_llm_calls: 0,
                max_llm_tokens: 0,
                llm_calls_made: 0,
                llm_tokens_used: 0,
            },
            PermissionPreset::Sandboxed => PermissionRecord {
                can_exec: true,
                can_read: true,
                can_write: true,
                can_think: true,
                can_spawn: false,
                can_http: false,
                allowed_read_paths: vec!["/tmp/*".to_string(), "/home/*".to_string()],
                allowed_write_paths: vec!["/tmp/*".to_string()],
                blocked_paths: default_blocked_paths(),
                allowed_commands: Vec::new(),
                blocked_commands: default_blocked_commands(),
                allowed_domains: Vec::new(),
                max_llm_calls: 0,
                max_llm_tokens: 0,
                llm_calls_made: 0,
                llm_tokens_used: 0,
            },
            PermissionPreset::ReadOnly => PermissionRecord {
                can_exec: false,
                can_read: true,
                can_write: false,
                can_think: true,
                can_spawn: false,
                can_http: false,
                allowed_read_paths: Vec::new(),
                allowed_write_paths: Vec::new(),
                blocked_paths: default_blocked_paths(),
                allowed_commands: Vec::new(),
                blocked_commands: default_blocked_commands(),
                allowed_domains: Vec::new(),
                max_llm_calls: 0,
                max_llm_tokens: 0,
                llm_calls_made: 0,
                llm_tokens_used: 0,
            },
            PermissionPreset::Minimal => PermissionRecord {
                can_exec: false,
                can_read: false,
                can_write: false,
                can_think: true,
                can_spawn: false,
                can_http: false,
                allowed_read_paths: Vec::new(),
                allowed_write_paths: Vec::new(),
                blocked_paths: default_blocked_paths(),
                allowed_commands: Vec::new(),
                blocked_commands: default_blocked_commands(),
                allowed_domains: Vec::new(),
                max_llm_calls: 0,
                max_llm_tokens: 0,
                llm_calls_made: 0,
                llm_tokens_used: 0,
            },
        }
    }
}

impl Default for PermissionPreset {
    fn default() -> Self {
        PermissionPreset::Standard
    }
}

#[cfg(test)]
#[path = "preset_tests.rs"]
mod tests;
