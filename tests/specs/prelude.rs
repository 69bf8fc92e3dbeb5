//! Shared end-to-end harness: boots a real `cloved` process against a
//! scratch socket and speaks the wire protocol directly (§4.1, §4.3),
//! rather than driving the dispatcher in-process the way each crate's own
//! unit tests do.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin;
use clove_core::{AgentId, Value};
use clove_wire::{Frame, Opcode, HEADER_LEN};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// Generous upper bound for any condition this harness polls for; real
/// conditions resolve far sooner; this only guards against a hang.
pub const WAIT_MAX_MS: u64 = 5_000;

/// Poll `cond` every 10ms until it returns true or `max_ms` elapses.
/// Returns whether it converged.
pub fn wait_for(max_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// A `cloved` instance bound to a private scratch socket, torn down on
/// drop so a panicking test never leaves a zombie kernel behind.
pub struct Kernel {
    child: Child,
    pub socket_path: PathBuf,
    _temp: tempfile::TempDir,
}

impl Kernel {
    /// Start a fresh kernel with the default 5s stop timeout.
    pub fn start() -> Self {
        Self::start_with_env(&[])
    }

    /// Start a fresh kernel with additional environment variables (e.g. a
    /// shorter `CLOVE_STOP_TIMEOUT_MS` so kill-escalation specs stay fast).
    pub fn start_with_env(extra_env: &[(&str, &str)]) -> Self {
        let temp = tempfile::tempdir().expect("create scratch dir");
        let socket_path = temp.path().join("clove.sock");

        let mut cmd = Command::new(cargo_bin("cloved"));
        cmd.arg(&socket_path);
        for (key, value) in extra_env {
            cmd.env(key, value);
        }
        let child = cmd.spawn().expect("spawn cloved");

        let socket_path_clone = socket_path.clone();
        let ready = wait_for(WAIT_MAX_MS, || UnixStream::connect(&socket_path_clone).is_ok());
        assert!(ready, "cloved never opened its socket at {}", socket_path.display());

        Self {
            child,
            socket_path,
            _temp: temp,
        }
    }

    /// Open a new client connection, completing its implicit `NOOP`
    /// handshake (see [`Client::connect`]).
    pub fn connect(&self) -> Client {
        Client::connect(&self.socket_path)
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        let _ = kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM);
        let exited = wait_for(2_000, || matches!(self.child.try_wait(), Ok(Some(_))));
        if !exited {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// One client connection. Every new client is assigned its agent id on
/// accept (§4.3); this harness learns it from the response to the implicit
/// probe `NOOP` sent by [`Client::connect`].
pub struct Client {
    stream: UnixStream,
    pub agent_id: u32,
}

impl Client {
    pub fn connect(socket_path: &std::path::Path) -> Self {
        let stream = connect_with_retry(socket_path);
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .expect("set read timeout");
        let mut client = Self { stream, agent_id: 0 };

        let probe = b"clove-specs-handshake".to_vec();
        let response = client.call_raw(Opcode::Noop, probe.clone());
        assert_eq!(response.payload, probe, "NOOP must echo its payload unchanged (§4.1)");
        client.agent_id = response.agent_id.0;
        client
    }

    /// Send one frame and block for its response frame.
    pub fn call_raw(&mut self, opcode: Opcode, payload: Vec<u8>) -> Frame {
        let mut out = Vec::new();
        Frame::new(AgentId(0), opcode, payload)
            .encode(&mut out)
            .expect("encode frame");
        self.stream.write_all(&out).expect("write frame");
        self.read_frame()
    }

    /// Send raw bytes with no framing applied — for protocol-corruption
    /// specs that need to put malformed headers on the wire deliberately.
    pub fn write_raw_bytes(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).expect("write raw bytes");
    }

    /// Send a JSON request body and decode the JSON response body.
    pub fn call(&mut self, opcode: Opcode, body: Value) -> Value {
        let payload = serde_json::to_vec(&body).expect("serialize request body");
        let response = self.call_raw(opcode, payload);
        serde_json::from_slice(&response.payload).expect("response body is JSON")
    }

    pub fn read_frame(&mut self) -> Frame {
        let mut header = [0u8; HEADER_LEN];
        self.stream.read_exact(&mut header).expect("read frame header");
        let payload_size = u64::from_ne_bytes(header[9..17].try_into().expect("8 bytes"));
        let mut payload = vec![0u8; payload_size as usize];
        if payload_size > 0 {
            self.stream.read_exact(&mut payload).expect("read frame payload");
        }
        let opcode = header[8];
        let agent_id = u32::from_ne_bytes(header[4..8].try_into().expect("4 bytes"));
        Frame {
            agent_id: AgentId(agent_id),
            opcode,
            payload,
        }
    }
}

fn connect_with_retry(socket_path: &std::path::Path) -> UnixStream {
    let deadline = Instant::now() + Duration::from_millis(WAIT_MAX_MS);
    loop {
        match UnixStream::connect(socket_path) {
            Ok(stream) => return stream,
            Err(e) if Instant::now() < deadline => {
                let _ = e;
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => panic!("failed to connect to {}: {e}", socket_path.display()),
        }
    }
}

/// Write an executable script to a fresh temp file and return its path
/// (kept alive by leaking the containing `TempDir` — fine for short-lived
/// test processes, and it lets the returned path outlive the helper call).
pub fn write_script(contents: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("create script dir");
    let path = dir.path().join("script.sh");
    std::fs::write(&path, contents).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    std::mem::forget(dir);
    path
}
