// SPDX-License-Identifier: MIT

use super::*;
use clove_core::AgentId;
use serde_json::json;

fn entry(sequence_id: u64) -> RecordingEntry {
    RecordingEntry {
        sequence_id,
        timestamp_ms: 0,
        agent_id: AgentId(1),
        opcode: 0x20,
        request_payload: json!({}),
        response_payload: json!({}),
        duration_us: 10,
        success: true,
    }
}

#[test]
fn empty_buffer_starts_completed() {
    let log = ReplayLog::new(vec![]);
    assert_eq!(log.state(), ReplayState::Completed);
    assert!(log.get_next_replay_entry().is_none());
}

#[test]
fn advances_through_entries_to_completion() {
    let mut log = ReplayLog::new(vec![entry(1), entry(2)]);
    assert_eq!(log.state(), ReplayState::Running);
    assert_eq!(log.get_next_replay_entry().unwrap().sequence_id, 1);
    log.advance_replay(false);
    assert_eq!(log.state(), ReplayState::Running);
    assert_eq!(log.get_next_replay_entry().unwrap().sequence_id, 2);
    log.advance_replay(false);
    assert_eq!(log.state(), ReplayState::Completed);
    assert!(log.get_next_replay_entry().is_none());
}

#[test]
fn pause_blocks_next_entry_until_resumed() {
    let mut log = ReplayLog::new(vec![entry(1), entry(2)]);
    log.pause();
    assert_eq!(log.state(), ReplayState::Paused);
    assert!(log.get_next_replay_entry().is_none());
    log.resume();
    assert_eq!(log.get_next_replay_entry().unwrap().sequence_id, 1);
}

#[test]
fn fail_is_terminal_until_a_new_replay_is_started() {
    let mut log = ReplayLog::new(vec![entry(1)]);
    log.fail();
    assert_eq!(log.state(), ReplayState::Error);
    assert!(log.get_next_replay_entry().is_none());
    log.advance_replay(false);
    assert_eq!(log.state(), ReplayState::Error);
}
