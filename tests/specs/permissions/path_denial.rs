//! §8 scenario 3 ("Permission denial on read").

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn sandboxed_preset_denies_read_of_etc_passwd_and_emits_syscall_blocked() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let subscribe = client.call(Opcode::Subscribe, serde_json::json!({"types": ["syscall_blocked"]}));
    assert_eq!(subscribe["success"], true);

    let set_perms = client.call(Opcode::SetPerms, serde_json::json!({"preset": "sandboxed"}));
    assert_eq!(set_perms["success"], true, "set_perms failed: {set_perms:?}");

    let read = client.call(Opcode::Read, serde_json::json!({"path": "/etc/passwd"}));
    assert_eq!(read["success"], false);
    let error = read["error"].as_str().expect("error string");
    assert!(error.contains("path not allowed"), "unexpected error message: {error}");

    let polled = client.call(Opcode::PollEvents, serde_json::json!({"max": 10}));
    let events = polled["events"].as_array().expect("events array");
    assert!(
        events.iter().any(|e| e.get("type").and_then(|t| t.as_str()) == Some("syscall_blocked")),
        "expected a SyscallBlocked event, got {events:?}"
    );
}

#[test]
fn sandboxed_preset_allows_read_under_tmp() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let set_perms = client.call(Opcode::SetPerms, serde_json::json!({"preset": "sandboxed"}));
    assert_eq!(set_perms["success"], true);

    let path = std::env::temp_dir().join(format!("clove-spec-{}.txt", std::process::id()));
    std::fs::write(&path, b"hi").expect("write scratch file");

    let read = client.call(Opcode::Read, serde_json::json!({"path": path.to_string_lossy()}));
    assert_eq!(read["success"], true, "read failed: {read:?}");
    assert_eq!(read["content"], "hi");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn minimal_preset_denies_exec_capability_outright() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    let set_perms = client.call(Opcode::SetPerms, serde_json::json!({"preset": "minimal"}));
    assert_eq!(set_perms["success"], true);

    let exec = client.call(Opcode::Exec, serde_json::json!({"command": "echo hi"}));
    assert_eq!(exec["success"], false);
    assert!(exec["error"].as_str().unwrap_or_default().contains("permission denied"));
}
