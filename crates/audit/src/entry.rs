// SPDX-License-Identifier: MIT

use clove_core::{AgentId, Value};
use serde::Serialize;

use crate::category::Category;

/// `{monotonic_id, timestamp, category, event_type, agent_id, agent_name?,
/// details, success}` (§3).
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: u64,
    pub timestamp_ms: u64,
    pub category: Category,
    pub event_type: String,
    pub agent_id: AgentId,
    pub agent_name: Option<String>,
    pub details: Value,
    pub success: bool,
}
