//! §4.9 scope rules: `Agent`-scoped entries are private to their owner;
//! `Global` is visible to everyone.

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn agent_scoped_entry_is_invisible_to_other_agents() {
    let kernel = Kernel::start();
    let mut owner = kernel.connect();
    let mut other = kernel.connect();

    let store = owner.call(
        Opcode::Store,
        serde_json::json!({"key": "secret", "value": "mine", "scope": "agent"}),
    );
    assert_eq!(store["success"], true);

    let fetch_by_other = other.call(Opcode::Fetch, serde_json::json!({"key": "secret"}));
    assert_eq!(fetch_by_other["success"], false);
    assert_eq!(fetch_by_other["not_found"], true);

    let fetch_by_owner = owner.call(Opcode::Fetch, serde_json::json!({"key": "secret"}));
    assert_eq!(fetch_by_owner["success"], true);
    assert_eq!(fetch_by_owner["value"], "mine");
}

#[test]
fn global_scoped_entry_is_visible_and_writable_by_any_agent() {
    let kernel = Kernel::start();
    let mut writer = kernel.connect();
    let mut reader = kernel.connect();

    let store = writer.call(
        Opcode::Store,
        serde_json::json!({"key": "shared", "value": 1, "scope": "global"}),
    );
    assert_eq!(store["success"], true);

    let fetch = reader.call(Opcode::Fetch, serde_json::json!({"key": "shared"}));
    assert_eq!(fetch["success"], true);
    assert_eq!(fetch["value"], 1);

    let overwrite = reader.call(
        Opcode::Store,
        serde_json::json!({"key": "shared", "value": 2, "scope": "global"}),
    );
    assert_eq!(overwrite["success"], true);

    let refetch = writer.call(Opcode::Fetch, serde_json::json!({"key": "shared"}));
    assert_eq!(refetch["value"], 2);
}
