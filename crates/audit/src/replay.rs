// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::execution_log::RecordingEntry;

/// `Idle -> Running <-> Paused -> Completed`, with `Error` reachable from
/// `Running` whenever a replayed syscall diverges from its recorded
/// response (§4.12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayState {
    Idle,
    Running,
    Paused,
    Completed,
    Error,
}

/// Feeds a previously recorded buffer back out one entry at a time for
/// deterministic replay. Holds its own copy of the recording so replaying
/// doesn't disturb an active (or subsequent) recording session.
#[derive(Debug)]
pub struct ReplayLog {
    entries: Vec<RecordingEntry>,
    cursor: usize,
    state: ReplayState,
}

impl ReplayLog {
    /// `REPLAY_START`. Loads a recorded buffer (typically imported via
    /// `GET_AUDIT_LOG`-style export/import, held separately from the live
    /// recording buffer) and begins replay from its first entry.
    pub fn new(entries: Vec<RecordingEntry>) -> Self {
        let state = if entries.is_empty() {
            ReplayState::Completed
        } else {
            ReplayState::Running
        };
        Self {
            entries,
            cursor: 0,
            state,
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn pause(&mut self) {
        if self.state == ReplayState::Running {
            self.state = ReplayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ReplayState::Paused {
            self.state = ReplayState::Running;
        }
    }

    /// Mark the session as diverged. Terminal: only a fresh `REPLAY_START`
    /// recovers from `Error`.
    pub fn fail(&mut self) {
        self.state = ReplayState::Error;
    }

    /// The next entry due for replay, or `None` if paused, errored, or
    /// already completed.
    pub fn get_next_replay_entry(&self) -> Option<&RecordingEntry> {
        if self.state != ReplayState::Running {
            return None;
        }
        self.entries.get(self.cursor)
    }

    /// Advance the cursor past the entry just handed out by
    /// [`Self::get_next_replay_entry`]. `skipped` records whether the caller
    /// chose to skip re-issuing it (e.g. a pure read replayed for timing
    /// only) rather than actually invoking it; callers may use it for
    /// reporting but it never changes the advance itself. Transitions to
    /// `Completed` once the buffer is exhausted.
    pub fn advance_replay(&mut self, _skipped: bool) {
        if self.state != ReplayState::Running {
            return;
        }
        self.cursor += 1;
        if self.cursor >= self.entries.len() {
            self.state = ReplayState::Completed;
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
