//! §4.8 `REGISTER`/`SEND` by name.

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn register_then_send_by_name_round_trips() {
    let kernel = Kernel::start();
    let mut owner = kernel.connect();
    let mut sender = kernel.connect();

    let register = owner.call(Opcode::Register, serde_json::json!({"name": "echo-target"}));
    assert_eq!(register["success"], true);

    let send = sender.call(
        Opcode::Send,
        serde_json::json!({"to_name": "echo-target", "message": "hi"}),
    );
    assert_eq!(send["success"], true, "send failed: {send:?}");

    let recv = owner.call(Opcode::Recv, serde_json::json!({"max": 10}));
    let messages = recv["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["body"], "hi");
}

#[test]
fn registering_a_name_already_held_by_another_agent_fails() {
    let kernel = Kernel::start();
    let mut first = kernel.connect();
    let mut second = kernel.connect();

    let register_first = first.call(Opcode::Register, serde_json::json!({"name": "taken"}));
    assert_eq!(register_first["success"], true);

    let register_second = second.call(Opcode::Register, serde_json::json!({"name": "taken"}));
    assert_eq!(register_second["success"], false);
    assert!(register_second["error"].as_str().unwrap_or_default().contains("already registered"));
}

#[test]
fn sending_to_an_unknown_name_fails() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let send = client.call(
        Opcode::Send,
        serde_json::json!({"to_name": "nobody", "message": "hi"}),
    );
    assert_eq!(send["success"], false);
}
