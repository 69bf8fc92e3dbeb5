// SPDX-License-Identifier: MIT

use std::collections::VecDeque;

use clove_core::{AgentId, Value};

use crate::category::{AuditConfig, Category};
use crate::entry::AuditEntry;

/// Default ring buffer retention (§3): "Retention is a ring of at most
/// `max_entries` (default 10 000)."
pub const DEFAULT_MAX_AUDIT_ENTRIES: usize = 10_000;

pub(crate) fn default_max_entries() -> usize {
    DEFAULT_MAX_AUDIT_ENTRIES
}

/// Query parameters for `GET_AUDIT_LOG` (§4.12): optional category filter,
/// optional agent filter, a `since_id` cursor, and a result `limit`.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub category: Option<Category>,
    pub agent_id: Option<AgentId>,
    pub since_id: Option<u64>,
    pub limit: Option<usize>,
}

/// The category-filtered, ring-buffered audit log. Entries are assigned
/// strictly monotonically increasing, gap-free ids that never reset, even
/// as old entries fall off the ring (§8 Testable Properties).
#[derive(Debug)]
pub struct AuditLog {
    config: AuditConfig,
    entries: VecDeque<AuditEntry>,
    next_id: u64,
}

impl AuditLog {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            entries: VecDeque::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AuditConfig) {
        // Shrinking max_entries must retroactively drop the oldest excess
        // entries rather than wait for the next append.
        while self.entries.len() > config.max_entries {
            self.entries.pop_front();
        }
        self.config = config;
    }

    /// Append an entry if `category` is currently enabled. Returns `true` if
    /// it was recorded.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        category: Category,
        event_type: impl Into<String>,
        agent_id: AgentId,
        agent_name: Option<String>,
        details: Value,
        success: bool,
        timestamp_ms: u64,
    ) -> bool {
        if !self.config.is_enabled(category) {
            return false;
        }
        let id = self.next_id;
        self.next_id += 1;
        if self.entries.len() >= self.config.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(AuditEntry {
            id,
            timestamp_ms,
            category,
            event_type: event_type.into(),
            agent_id,
            agent_name,
            details,
            success,
        });
        true
    }

    /// `GET_AUDIT_LOG`. Entries are scanned newest-first so `limit` keeps the
    /// most recent page, then reversed to chronological order before being
    /// handed back (§4.12).
    pub fn query(&self, query: &AuditQuery) -> Vec<&AuditEntry> {
        let limit = query.limit.unwrap_or(100);
        let mut matches: Vec<&AuditEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|e| query.category.is_none_or_eq(e.category))
            .filter(|e| query.agent_id.is_none_or_eq(e.agent_id))
            .filter(|e| query.since_id.map(|since| e.id > since).unwrap_or(true))
            .take(limit)
            .collect();
        matches.reverse();
        matches
    }

    /// JSONL export of the current buffer in full (§4.12).
    pub fn export_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tiny helper so `query()`'s filter chain reads as one expression per
/// field instead of a nested `match` on each optional filter.
trait IsNoneOrEq<T> {
    fn is_none_or_eq(&self, value: T) -> bool;
}

impl<T: PartialEq> IsNoneOrEq<T> for Option<T> {
    fn is_none_or_eq(&self, value: T) -> bool {
        match self {
            None => true,
            Some(expected) => *expected == value,
        }
    }
}

#[cfg(test)]
#[path = "audit_log_tests.rs"]
mod tests;
