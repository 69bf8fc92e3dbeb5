// SPDX-License-Identifier: MIT

use clove_core::{AgentId, Value};
use serde::{Deserialize, Serialize};

use clove_wire::Opcode;

/// `{sequence_id, timestamp, agent_id, opcode, request_payload,
/// response_payload, duration_us, success}` (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub sequence_id: u64,
    pub timestamp_ms: u64,
    pub agent_id: AgentId,
    pub opcode: u8,
    pub request_payload: Value,
    pub response_payload: Value,
    pub duration_us: u64,
    pub success: bool,
}

/// `Idle -> Recording <-> Paused -> Idle` (§4.12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    Idle,
    Recording,
    Paused,
}

/// Which opcodes get recorded. Non-deterministic/read-only opcodes are
/// excluded by default (§4.12): `THINK`/`HTTP`/`EXEC` are gated by their
/// `include_*` flag here, the fixed pure-read set is always excluded via
/// [`Opcode::is_pure_read`], and an optional `filter_agents` list narrows
/// recording to specific agents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingConfig {
    #[serde(default)]
    pub include_think: bool,
    #[serde(default)]
    pub include_http: bool,
    #[serde(default)]
    pub include_exec: bool,
    #[serde(default)]
    pub filter_agents: Option<Vec<AgentId>>,
}

/// The execution log: a state machine plus the active recording buffer.
/// Separate from the audit log — this one exists to support deterministic
/// replay, not security observability (§4.12).
#[derive(Debug)]
pub struct ExecutionLog {
    config: RecordingConfig,
    state: RecordingState,
    buffer: Vec<RecordingEntry>,
    next_seq: u64,
}

impl ExecutionLog {
    pub fn new(config: RecordingConfig) -> Self {
        Self {
            config,
            state: RecordingState::Idle,
            buffer: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn set_config(&mut self, config: RecordingConfig) {
        self.config = config;
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn buffer(&self) -> &[RecordingEntry] {
        &self.buffer
    }

    /// `RECORD_START`. From `Idle`, clears the buffer and resets the
    /// sequence counter, then starts a fresh session. From `Paused`, simply
    /// resumes the existing session. A no-op if already `Recording`.
    pub fn start(&mut self) {
        match self.state {
            RecordingState::Idle => {
                self.buffer.clear();
                self.next_seq = 1;
                self.state = RecordingState::Recording;
            }
            RecordingState::Paused => self.state = RecordingState::Recording,
            RecordingState::Recording => {}
        }
    }

    /// Pause an active recording session without clearing its buffer.
    pub fn pause(&mut self) {
        if self.state == RecordingState::Recording {
            self.state = RecordingState::Paused;
        }
    }

    /// `RECORD_STOP`.
    pub fn stop(&mut self) {
        self.state = RecordingState::Idle;
    }

    fn opcode_eligible(&self, opcode: Opcode) -> bool {
        if opcode.is_pure_read() {
            return false;
        }
        match opcode {
            Opcode::Think => self.config.include_think,
            Opcode::Http => self.config.include_http,
            Opcode::Exec => self.config.include_exec,
            _ => true,
        }
    }

    fn agent_eligible(&self, agent_id: AgentId) -> bool {
        match &self.config.filter_agents {
            None => true,
            Some(allowed) => allowed.contains(&agent_id),
        }
    }

    /// Append one syscall's request/response pair if recording is active
    /// and the opcode/agent pass the recording config's filters. Returns the
    /// assigned sequence id, if recorded.
    #[allow(clippy::too_many_arguments)]
    pub fn append(
        &mut self,
        opcode: Opcode,
        agent_id: AgentId,
        request_payload: Value,
        response_payload: Value,
        duration_us: u64,
        success: bool,
        timestamp_ms: u64,
    ) -> Option<u64> {
        if self.state != RecordingState::Recording {
            return None;
        }
        if !self.opcode_eligible(opcode) || !self.agent_eligible(agent_id) {
            return None;
        }
        let sequence_id = self.next_seq;
        self.next_seq += 1;
        self.buffer.push(RecordingEntry {
            sequence_id,
            timestamp_ms,
            agent_id,
            opcode: opcode.as_u8(),
            request_payload,
            response_payload,
            duration_us,
            success,
        });
        Some(sequence_id)
    }
}

#[cfg(test)]
#[path = "execution_log_tests.rs"]
mod tests;
