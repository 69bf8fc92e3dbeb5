// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::pattern::{
    canonicalize_for_match, command_allowed, command_blocked, domain_matches, extract_domain,
    path_glob_matches,
};

/// A single agent's capability flags, pattern lists, and LLM quota
/// counters. Created lazily on first permission check with
/// [`PermissionPreset::Standard`](crate::PermissionPreset::Standard) as the
/// implicit default, then overwritten wholesale by `SET_PERMS`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionRecord {
    pub can_exec: bool,
    pub can_read: bool,
    pub can_write: bool,
    pub can_think: bool,
    pub can_spawn: bool,
    pub can_http: bool,

    /// Empty means "no read restriction beyond `blocked_paths`".
    #[serde(default)]
    pub allowed_read_paths: Vec<String>,
    /// Empty means "no write restriction beyond `blocked_paths`". Kept
    /// separate from `allowed_read_paths` because `Sandboxed` grants a wider
    /// read scope than write scope.
    #[serde(default)]
    pub allowed_write_paths: Vec<String>,
    #[serde(default)]
    pub blocked_paths: Vec<String>,
    #[serde(default)]
    pub allowed_commands: Vec<String>,
    #[serde(default)]
    pub blocked_commands: Vec<String>,
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// `0` means unlimited.
    #[serde(default)]
    pub max_llm_calls: u64,
    /// `0` means unlimited.
    #[serde(default)]
    pub max_llm_tokens: u64,

    #[serde(default)]
    pub llm_calls_made: u64,
    #[serde(default)]
    pub llm_tokens_used: u64,
}

impl PermissionRecord {
    /// `can_read_path(path)` per the spec: the capability flag must be set,
    /// the path must not match any blocked pattern, and either the allow
    /// list is empty or the path matches some allowed pattern.
    pub fn can_read_path(&self, path: &str) -> bool {
        self.can_read && self.path_allowed(path, &self.allowed_read_paths, &self.blocked_paths)
    }

    pub fn can_write_path(&self, path: &str) -> bool {
        self.can_write && self.path_allowed(path, &self.allowed_write_paths, &self.blocked_paths)
    }

    fn path_allowed(&self, path: &str, allowed: &[String], blocked: &[String]) -> bool {
        let canonical = canonicalize_for_match(std::path::Path::new(path));
        let canonical_str = canonical.to_string_lossy();

        let is_blocked = blocked
            .iter()
            .any(|pattern| path_glob_matches(pattern, &canonical_str) || path_glob_matches(pattern, path));
        if is_blocked {
            return false;
        }

        allowed.is_empty()
            || allowed
                .iter()
                .any(|pattern| path_glob_matches(pattern, &canonical_str) || path_glob_matches(pattern, path))
    }

    pub fn can_execute_command(&self, cmd: &str) -> bool {
        self.can_exec
            && !command_blocked(&self.blocked_commands, cmd)
            && command_allowed(&self.allowed_commands, cmd)
    }

    /// An empty `allowed_domains` list denies all HTTP, even with `can_http`
    /// set — there is no implicit allow-all like there is for paths and
    /// commands.
    pub fn can_access_domain(&self, url: &str) -> bool {
        if !self.can_http {
            return false;
        }
        let domain = extract_domain(url);
        self.allowed_domains
            .iter()
            .any(|pattern| domain_matches(pattern, &domain))
    }

    pub fn can_use_llm(&self, estimated_tokens: u64) -> bool {
        self.can_think
            && (self.max_llm_calls == 0 || self.llm_calls_made < self.max_llm_calls)
            && (self.max_llm_tokens == 0
                || self.llm_tokens_used + estimated_tokens <= self.max_llm_tokens)
    }

    /// Record actual usage after an LLM call returns. Monotonic: never
    /// decreases, even if a caller passes a smaller `tokens` than was
    /// estimated before the call.
    pub fn record_llm_usage(&mut self, tokens: u64) {
        self.llm_calls_made += 1;
        self.llm_tokens_used += tokens;
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
