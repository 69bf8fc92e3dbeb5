//! §8 scenario 2 ("Restart with escalation").

use crate::prelude::*;
use clove_wire::Opcode;

fn count_events(events: &[serde_json::Value], type_name: &str) -> usize {
    events
        .iter()
        .filter(|e| e.get("type").and_then(|t| t.as_str()) == Some(type_name))
        .count()
}

#[test]
fn crashy_agent_restarts_three_times_then_escalates_exactly_once() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let subscribe = client.call(
        Opcode::Subscribe,
        serde_json::json!({"types": ["agent_restarting", "agent_escalated"]}),
    );
    assert_eq!(subscribe["success"], true);

    let spawn = client.call(
        Opcode::Spawn,
        serde_json::json!({
            "name": "crashy",
            "script": "false",
            "sandboxed": false,
            "restart": {
                "policy": "on_failure",
                "max_restarts": 3,
                "restart_window_sec": 60,
                "backoff_initial_ms": 10,
                "backoff_max_ms": 1000,
                "backoff_multiplier": 2.0,
            }
        }),
    );
    assert_eq!(spawn["success"], true, "spawn failed: {spawn:?}");

    let mut restarting = 0usize;
    let mut escalated = 0usize;
    let mut seen = Vec::new();

    let converged = wait_for(WAIT_MAX_MS, || {
        let polled = client.call(Opcode::PollEvents, serde_json::json!({"max": 100}));
        if let Some(events) = polled["events"].as_array() {
            restarting += count_events(events, "agent_restarting");
            escalated += count_events(events, "agent_escalated");
            seen.extend(events.clone());
        }
        restarting >= 3 && escalated >= 1
    });
    assert!(
        converged,
        "expected 3 restarts + 1 escalation within {WAIT_MAX_MS}ms; saw restarting={restarting} escalated={escalated} events={seen:?}"
    );

    // No fourth restart should ever follow the escalation.
    std::thread::sleep(std::time::Duration::from_millis(200));
    let polled = client.call(Opcode::PollEvents, serde_json::json!({"max": 100}));
    let extra = polled["events"].as_array().map(Vec::len).unwrap_or(0);
    assert_eq!(extra, 0, "no further lifecycle events expected after escalation, got {polled:?}");

    assert_eq!(restarting, 3, "expected exactly 3 AgentRestarting events, saw {restarting}");
    assert_eq!(escalated, 1, "expected exactly 1 AgentEscalated event, saw {escalated}");
}
