// SPDX-License-Identifier: MIT

//! Two independent logs (§4.12): the category-filtered, ring-buffered audit
//! log (`GET_AUDIT_LOG`/`SET_AUDIT_CONFIG`), and the sequence-numbered
//! execution log that records syscalls for later deterministic replay
//! (`RECORD_*`/`REPLAY_*`).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod audit_log;
mod category;
mod entry;
mod execution_log;
mod replay;

pub use audit_log::{AuditLog, AuditQuery, DEFAULT_MAX_AUDIT_ENTRIES};
pub use category::{AuditConfig, Category};
pub use entry::AuditEntry;
pub use execution_log::{ExecutionLog, RecordingConfig, RecordingEntry, RecordingState};
pub use replay::{ReplayLog, ReplayState};
