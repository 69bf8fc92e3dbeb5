//! §8 scenario 5 ("State TTL") and the store/fetch/delete round trip.

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn fetch_after_ttl_expiry_reports_not_found() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let store = client.call(
        Opcode::Store,
        serde_json::json!({"key": "k", "value": "v", "scope": "global", "ttl_ms": 50}),
    );
    assert_eq!(store["success"], true, "store failed: {store:?}");

    std::thread::sleep(std::time::Duration::from_millis(150));

    let fetch = client.call(Opcode::Fetch, serde_json::json!({"key": "k"}));
    assert_eq!(fetch["success"], false);
    assert_eq!(fetch["not_found"], true);

    let keys = client.call(Opcode::Keys, serde_json::json!({"prefix": "k"}));
    let keys = keys["keys"].as_array().expect("keys array");
    assert!(!keys.iter().any(|k| k == "k"), "expired key must not appear in KEYS: {keys:?}");
}

#[test]
fn store_fetch_delete_round_trip() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let store = client.call(
        Opcode::Store,
        serde_json::json!({"key": "counter", "value": 42, "scope": "agent"}),
    );
    assert_eq!(store["success"], true);

    let fetch = client.call(Opcode::Fetch, serde_json::json!({"key": "counter"}));
    assert_eq!(fetch["success"], true);
    assert_eq!(fetch["value"], 42);

    let delete = client.call(Opcode::Delete, serde_json::json!({"key": "counter"}));
    assert_eq!(delete["success"], true);

    // Idempotent: deleting again still succeeds.
    let delete_again = client.call(Opcode::Delete, serde_json::json!({"key": "counter"}));
    assert_eq!(delete_again["success"], true);

    let fetch_after = client.call(Opcode::Fetch, serde_json::json!({"key": "counter"}));
    assert_eq!(fetch_after["success"], false);
    assert_eq!(fetch_after["not_found"], true);
}
