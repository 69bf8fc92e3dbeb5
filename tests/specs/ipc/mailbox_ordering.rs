//! §8 scenario 4 ("Mailbox ordering").

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn messages_from_one_sender_arrive_in_send_order() {
    let kernel = Kernel::start();
    let mut a = kernel.connect();
    let mut b = kernel.connect();

    let reg_a = a.call(Opcode::Register, serde_json::json!({"name": "agent-a"}));
    assert_eq!(reg_a["success"], true);
    let reg_b = b.call(Opcode::Register, serde_json::json!({"name": "agent-b"}));
    assert_eq!(reg_b["success"], true);

    for i in 1..=3 {
        let sent = a.call(
            Opcode::Send,
            serde_json::json!({"to_name": "agent-b", "message": {"i": i}}),
        );
        assert_eq!(sent["success"], true, "send {i} failed: {sent:?}");
        // Age ordering only holds if enqueue times differ; give the clock
        // a tick between sends.
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let recv = b.call(Opcode::Recv, serde_json::json!({"max": 10}));
    assert_eq!(recv["success"], true);
    let messages = recv["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 3);

    let is: Vec<i64> = messages
        .iter()
        .map(|m| m["body"]["i"].as_i64().expect("body.i"))
        .collect();
    assert_eq!(is, vec![1, 2, 3], "messages must arrive in send order");

    let ages: Vec<u64> = messages
        .iter()
        .map(|m| m["age_ms"].as_u64().expect("age_ms"))
        .collect();
    for window in ages.windows(2) {
        assert!(
            window[0] >= window[1],
            "earlier-sent messages must be at least as old as later ones: {ages:?}"
        );
    }
}

#[test]
fn broadcast_delivers_to_every_registered_agent_except_sender_by_default() {
    let kernel = Kernel::start();
    let mut sender = kernel.connect();
    let mut r1 = kernel.connect();
    let mut r2 = kernel.connect();

    sender.call(Opcode::Register, serde_json::json!({"name": "broadcaster"}));
    r1.call(Opcode::Register, serde_json::json!({"name": "r1"}));
    r2.call(Opcode::Register, serde_json::json!({"name": "r2"}));

    let broadcast = sender.call(Opcode::Broadcast, serde_json::json!({"message": {"ping": true}}));
    assert_eq!(broadcast["success"], true);
    // Sender, r1, r2 are all registered; default excludes the sender.
    assert_eq!(broadcast["delivered"], 2);

    let recv1 = r1.call(Opcode::Recv, serde_json::json!({"max": 10}));
    let recv2 = r2.call(Opcode::Recv, serde_json::json!({"max": 10}));
    assert_eq!(recv1["messages"].as_array().expect("r1 messages").len(), 1);
    assert_eq!(recv2["messages"].as_array().expect("r2 messages").len(), 1);

    let recv_sender = sender.call(Opcode::Recv, serde_json::json!({"max": 10}));
    assert_eq!(recv_sender["messages"].as_array().expect("sender messages").len(), 0);
}
