// SPDX-License-Identifier: MIT

//! `THINK`/`EXEC`/`READ`/`WRITE` (§4.6): the four core syscalls every agent
//! leans on, each gated by its capability flag in the dispatcher and by a
//! finer-grained pattern check here.

use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;

use clove_agent::AgentAdapter;
use clove_core::{AgentId, Clock, Value};
use clove_llm::ThinkRequest;

use crate::dispatcher::{deny, fail, ok_with};
use crate::kernel::Kernel;

/// Default `EXEC` timeout when the caller doesn't supply one (§4.6).
const DEFAULT_EXEC_TIMEOUT_MS: u64 = 30_000;

pub fn think<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let req: ThinkRequest = match serde_json::from_value(request.clone()) {
        Ok(r) => r,
        Err(e) => return fail(format!("invalid THINK payload: {e}")),
    };

    let estimated_tokens = req.max_tokens.unwrap_or(0) as u64;
    let record = kernel.permissions.get_or_create(agent_id).clone();
    if !record.can_use_llm(estimated_tokens) {
        return deny(kernel, agent_id, clove_wire::Opcode::Think, "LLM quota exceeded");
    }

    match kernel.llm.think(&req) {
        Ok(resp) => {
            kernel
                .permissions
                .record_llm_usage(agent_id, resp.tokens.unwrap_or(0));
            if resp.success {
                let mut fields = serde_json::Map::new();
                fields.insert("content".to_string(), serde_json::json!(resp.content));
                fields.insert("tokens".to_string(), serde_json::json!(resp.tokens));
                ok_with(fields)
            } else {
                fail(resp.error.unwrap_or_else(|| "LLM worker reported failure".to_string()))
            }
        }
        Err(e) => fail(e.to_string()),
    }
}

pub fn read<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(path) = request.get("path").and_then(Value::as_str) else {
        return fail("missing `path` field");
    };

    let record = kernel.permissions.get_or_create(agent_id).clone();
    if !record.can_read_path(path) {
        return deny(kernel, agent_id, clove_wire::Opcode::Read, "path not allowed");
    }

    match std::fs::read(path) {
        Ok(bytes) => {
            let mut fields = serde_json::Map::new();
            fields.insert(
                "content".to_string(),
                Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            );
            ok_with(fields)
        }
        Err(e) => fail(format!("read failed: {e}")),
    }
}

pub fn write<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(path) = request.get("path").and_then(Value::as_str) else {
        return fail("missing `path` field");
    };
    let content = request.get("content").and_then(Value::as_str).unwrap_or("");

    let record = kernel.permissions.get_or_create(agent_id).clone();
    if !record.can_write_path(path) {
        return deny(kernel, agent_id, clove_wire::Opcode::Write, "path not allowed");
    }

    match std::fs::write(path, content) {
        Ok(()) => {
            let mut fields = serde_json::Map::new();
            fields.insert("bytes_written".to_string(), serde_json::json!(content.len()));
            ok_with(fields)
        }
        Err(e) => fail(format!("write failed: {e}")),
    }
}

pub fn exec<A: AgentAdapter, C: Clock>(
    kernel: &mut Kernel<A, C>,
    agent_id: AgentId,
    request: &Value,
) -> Value {
    let Some(command) = request.get("command").and_then(Value::as_str) else {
        return fail("missing `command` field");
    };

    let record = kernel.permissions.get_or_create(agent_id).clone();
    if !record.can_execute_command(command) {
        return deny(kernel, agent_id, clove_wire::Opcode::Exec, "command not allowed");
    }

    let timeout_ms = request
        .get("timeout_ms")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_EXEC_TIMEOUT_MS);
    let cwd = request.get("cwd").and_then(Value::as_str);

    run_bounded(command, cwd, Duration::from_millis(timeout_ms))
}

/// Read a child pipe to completion on a dedicated thread, returning the
/// accumulated (lossily-decoded) output once the pipe closes.
fn spawn_pipe_reader<R>(mut pipe: R) -> std::thread::JoinHandle<String>
where
    R: std::io::Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Run `command` via `sh -c`, in its own process group so a timeout can
/// kill the whole tree rather than just the shell (§5: "a bounded,
/// synchronous child-process run with a kill-on-timeout").
fn run_bounded(command: &str, cwd: Option<&str>, timeout: Duration) -> Value {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    // Group leader of its own process group so `killpg` reaches every
    // descendant the shell spawned, not just the shell itself.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid()
                .map(|_| ())
                .map_err(|e| std::io::Error::from_raw_os_error(e as i32))
        });
    }

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => return fail(format!("exec failed to start: {e}")),
    };
    let pid = child.id() as i32;

    // Drain stdout/stderr on their own threads concurrently with the
    // wait/timeout loop below: a child that writes more than one pipe
    // buffer's worth of output blocks until someone reads it, which would
    // otherwise wedge `try_wait` for the whole timeout every time.
    let stdout_reader = child.stdout.take().map(spawn_pipe_reader);
    let stderr_reader = child.stderr.take().map(spawn_pipe_reader);

    let deadline = Instant::now() + timeout;
    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = killpg(Pid::from_raw(pid), Signal::SIGKILL);
                    let _ = child.wait();
                    break None;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            Err(_) => break None,
        }
    };

    let stdout = stdout_reader.and_then(|h| h.join().ok()).unwrap_or_default();
    let stderr = stderr_reader.and_then(|h| h.join().ok()).unwrap_or_default();

    match exit_status {
        Some(status) => {
            let mut fields = serde_json::Map::new();
            fields.insert("stdout".to_string(), Value::String(stdout));
            fields.insert("stderr".to_string(), Value::String(stderr));
            fields.insert("exit_code".to_string(), serde_json::json!(status.code()));
            fields.insert("timed_out".to_string(), Value::Bool(false));
            ok_with(fields)
        }
        None => {
            let mut fields = serde_json::Map::new();
            fields.insert("stdout".to_string(), Value::String(stdout));
            fields.insert("stderr".to_string(), Value::String(stderr));
            fields.insert("exit_code".to_string(), Value::Null);
            fields.insert("timed_out".to_string(), Value::Bool(true));
            ok_with(fields)
        }
    }
}
