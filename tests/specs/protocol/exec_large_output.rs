//! `EXEC` must drain stdout/stderr concurrently with the wait/timeout loop
//! (§4.6, §5): a command writing more than one pipe buffer's worth of
//! output must not be mistaken for a hang.

use crate::prelude::*;
use clove_wire::Opcode;

#[test]
fn exec_survives_output_larger_than_a_pipe_buffer() {
    let kernel = Kernel::start();
    let mut client = kernel.connect();

    // Comfortably larger than the typical 64 KiB pipe buffer.
    let response = client.call(
        Opcode::Exec,
        serde_json::json!({
            "command": "yes | head -c 200000",
            "timeout_ms": 3_000,
        }),
    );

    assert_eq!(response["success"], true, "response: {response}");
    assert_eq!(response["timed_out"], false, "response: {response}");
    let stdout = response["stdout"].as_str().expect("stdout is a string");
    assert_eq!(stdout.len(), 200_000);
}
