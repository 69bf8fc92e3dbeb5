// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;

fn config_for(command: &str, args: &[&str]) -> LlmConfig {
    LlmConfig {
        command: command.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
        ..LlmConfig::default()
    }
}

#[test]
fn echoes_a_request_line_back() {
    // `cat` echoes each stdin line to stdout verbatim, so a JSON line sent
    // in comes back byte-identical (and therefore value-equal once parsed).
    let config = config_for("cat", &[]);
    let mut worker = SubprocessWorker::spawn(&config).unwrap();
    assert!(worker.is_alive());

    let payload = json!({"prompt": "hi", "model": "test"});
    let response = worker.send_request(&payload).unwrap();
    assert_eq!(response, payload);
}

#[test]
fn detects_death_after_process_exits() {
    let config = config_for("sh", &["-c", "exit 0"]);
    let mut worker = SubprocessWorker::spawn(&config).unwrap();

    // Give the shell time to exit and close stdout before we probe.
    std::thread::sleep(std::time::Duration::from_millis(100));
    assert!(!worker.is_alive());

    let err = worker.send_request(&json!({"prompt": "hi"})).unwrap_err();
    assert!(matches!(err, LlmError::WorkerDied(_)));
}

#[test]
fn malformed_response_line_is_reported() {
    // `printf` as the "worker" replies with one non-JSON line then exits.
    let config = config_for("sh", &["-c", "echo not-json"]);
    let mut worker = SubprocessWorker::spawn(&config).unwrap();
    let err = worker.send_request(&json!({"prompt": "hi"})).unwrap_err();
    assert!(matches!(err, LlmError::MalformedResponse(_)));
}
