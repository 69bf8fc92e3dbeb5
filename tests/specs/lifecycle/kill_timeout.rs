//! §8 scenario 6 ("Kill timeout escalation"): an agent that ignores
//! `SIGTERM` must still be reaped, via `SIGKILL`, within `stop_timeout_ms`.

use crate::prelude::*;
use clove_wire::Opcode;
use std::time::{Duration, Instant};

#[test]
fn kill_escalates_to_sigkill_when_agent_ignores_sigterm() {
    // Keep the spec's default 5s bound but shrink it so the test stays
    // fast; the escalation behavior being tested doesn't depend on the
    // exact timeout value.
    let kernel = Kernel::start_with_env(&[("CLOVE_STOP_TIMEOUT_MS", "300")]);
    let mut client = kernel.connect();

    let script = write_script(
        r#"#!/bin/sh
trap '' TERM
sleep 30
"#,
    );

    let spawn = client.call(
        Opcode::Spawn,
        serde_json::json!({
            "name": "stubborn",
            "script": script.to_string_lossy(),
            "sandboxed": false,
        }),
    );
    assert_eq!(spawn["success"], true, "spawn failed: {spawn:?}");

    let started = Instant::now();
    let kill = client.call(Opcode::Kill, serde_json::json!({"name": "stubborn"}));
    let elapsed = started.elapsed();

    assert_eq!(kill["success"], true, "kill failed: {kill:?}");
    assert_eq!(kill["killed"], true);
    assert!(
        elapsed < Duration::from_millis(2_000),
        "kill took {elapsed:?}, expected it to escalate to SIGKILL well within the stop timeout"
    );
}
