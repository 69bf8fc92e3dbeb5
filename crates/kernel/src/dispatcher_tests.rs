use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::sys::signal::Signal;

use clove_agent::{ProcessHandle, SpawnSpec};
use clove_audit::Category;
use clove_core::{AgentId, FakeClock};
use clove_sandbox::{IsolationStatus, SandboxError};
use clove_wire::Opcode;

use super::*;

struct FakeHandle {
    running: Arc<AtomicBool>,
}

impl ProcessHandle for FakeHandle {
    fn os_pid(&self) -> u32 {
        42
    }
    fn is_running(&mut self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
    fn exit_code(&self) -> Option<i32> {
        None
    }
    fn isolation_status(&self) -> &IsolationStatus {
        static STATUS: std::sync::OnceLock<IsolationStatus> = std::sync::OnceLock::new();
        STATUS.get_or_init(IsolationStatus::default)
    }
    fn send_signal(&self, _signal: Signal) -> Result<(), SandboxError> {
        Ok(())
    }
    fn teardown(&self) {}
}

#[derive(Default)]
struct FakeAdapter;

impl clove_agent::AgentAdapter for FakeAdapter {
    type Handle = FakeHandle;

    fn spawn(&self, _sandbox_name: &str, _spec: &SpawnSpec) -> Result<FakeHandle, SandboxError> {
        Ok(FakeHandle {
            running: Arc::new(AtomicBool::new(true)),
        })
    }
}

fn test_kernel() -> Kernel<FakeAdapter, FakeClock> {
    let config = crate::config::KernelConfig::default();
    Kernel::with_adapter_and_clock(
        &config,
        Arc::new(clove_core::AgentIdAllocator::new()),
        FakeAdapter,
        FakeClock::new(),
    )
}

fn body(value: &serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

#[test]
fn unknown_opcode_echoes_payload_unchanged() {
    let mut kernel = test_kernel();
    let payload = b"not even json";
    let result = handle_message(&mut kernel, AgentId(1), 0xEE, payload);
    assert_eq!(result.payload, payload);
    assert!(!result.close_connection);
}

#[test]
fn noop_echoes_payload_and_keeps_connection_open() {
    let mut kernel = test_kernel();
    let payload = body(&serde_json::json!({"ping": 1}));
    let result = handle_message(&mut kernel, AgentId(1), Opcode::Noop as u8, &payload);
    assert_eq!(result.payload, payload);
    assert!(!result.close_connection);
}

#[test]
fn exit_purges_agent_and_closes_connection() {
    let mut kernel = test_kernel();
    let agent = AgentId(7);
    kernel.mailboxes.register(agent, "exiting".to_string()).unwrap();

    let result = handle_message(&mut kernel, agent, Opcode::Exit as u8, b"{}");

    assert!(result.close_connection);
    assert_eq!(kernel.mailboxes.registry().resolve("exiting"), None);
}

#[test]
fn capability_gate_denies_exec_without_can_exec() {
    let mut kernel = test_kernel();
    let agent = AgentId(2);
    kernel.permissions.set_preset(agent, agent, clove_permissions::PermissionPreset::ReadOnly).unwrap();

    let payload = body(&serde_json::json!({"command": "echo hi"}));
    let result = handle_message(&mut kernel, agent, Opcode::Exec as u8, &payload);

    let response: serde_json::Value = serde_json::from_slice(&result.payload).unwrap();
    assert_eq!(response["success"], false);
    assert!(response["error"].as_str().unwrap().contains("permission denied"));
}

#[test]
fn routed_call_reaches_handler_and_returns_success() {
    let mut kernel = test_kernel();
    let agent = AgentId(3);
    kernel.permissions.set_preset(agent, agent, clove_permissions::PermissionPreset::Unrestricted).unwrap();

    let store_payload = body(&serde_json::json!({"key": "greeting", "value": "hello"}));
    let store_result = handle_message(&mut kernel, agent, Opcode::Store as u8, &store_payload);
    let store_response: serde_json::Value = serde_json::from_slice(&store_result.payload).unwrap();
    assert_eq!(store_response["success"], true);

    let fetch_payload = body(&serde_json::json!({"key": "greeting"}));
    let fetch_result = handle_message(&mut kernel, agent, Opcode::Fetch as u8, &fetch_payload);
    let fetch_response: serde_json::Value = serde_json::from_slice(&fetch_result.payload).unwrap();
    assert_eq!(fetch_response["success"], true);
    assert_eq!(fetch_response["value"], "hello");
}

#[test]
fn successful_call_is_recorded_in_the_audit_log_under_its_category() {
    let mut kernel = test_kernel();
    let agent = AgentId(4);
    kernel.permissions.set_preset(agent, agent, clove_permissions::PermissionPreset::Unrestricted).unwrap();

    let payload = body(&serde_json::json!({"key": "k", "value": 1}));
    let _ = handle_message(&mut kernel, agent, Opcode::Store as u8, &payload);

    let query = clove_audit::AuditQuery {
        category: Some(Category::StateStore),
        agent_id: Some(agent),
        since_id: None,
        limit: None,
    };
    let entries = kernel.audit.query(&query);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].success);
}

#[test]
fn every_dispatched_call_is_appended_to_the_execution_log() {
    let mut kernel = test_kernel();
    let agent = AgentId(5);
    kernel.permissions.set_preset(agent, agent, clove_permissions::PermissionPreset::Unrestricted).unwrap();

    kernel.execution.start();
    let payload = body(&serde_json::json!({"key": "k", "value": 1}));
    let _ = handle_message(&mut kernel, agent, Opcode::Store as u8, &payload);

    assert_eq!(kernel.execution.buffer().len(), 1);
}

#[test]
fn malformed_json_payload_is_treated_as_null_request() {
    let mut kernel = test_kernel();
    let agent = AgentId(6);
    kernel.permissions.set_preset(agent, agent, clove_permissions::PermissionPreset::Unrestricted).unwrap();

    // `STORE` with a `Null` request has neither `key` nor `value`, so the
    // handler fails cleanly rather than panicking on a missing field.
    let result = handle_message(&mut kernel, agent, Opcode::Store as u8, b"not json");
    let response: serde_json::Value = serde_json::from_slice(&result.payload).unwrap();
    assert_eq!(response["success"], false);
}
