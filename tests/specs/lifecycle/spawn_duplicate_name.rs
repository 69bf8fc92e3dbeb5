//! §4.5: the manager refuses to spawn a second live agent under a name
//! already held by another live agent.

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn spawning_a_duplicate_live_name_fails_without_mutating_state() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let script = write_script(
        r#"#!/bin/sh
sleep 5
"#,
    );
    let script_arg = script.to_string_lossy().into_owned();

    let first = client.call(
        Opcode::Spawn,
        serde_json::json!({"name": "dup", "script": script_arg, "sandboxed": false}),
    );
    assert_eq!(first["success"], true, "first spawn failed: {first:?}");

    let second = client.call(
        Opcode::Spawn,
        serde_json::json!({"name": "dup", "script": script_arg, "sandboxed": false}),
    );
    assert_eq!(second["success"], false);
    assert!(second["error"].as_str().is_some());

    let list = client.call(Opcode::List, serde_json::json!({}));
    let agents = list["agents"].as_array().expect("agents array");
    let dup_count = agents
        .iter()
        .filter(|a| a.get("name").and_then(|n| n.as_str()) == Some("dup"))
        .count();
    assert_eq!(dup_count, 1, "duplicate-name spawn must not add a second agent");

    client.call(Opcode::Kill, serde_json::json!({"name": "dup"}));
}
