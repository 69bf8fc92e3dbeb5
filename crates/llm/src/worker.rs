// SPDX-License-Identifier: MIT

//! The subprocess half of the gateway: one JSON object per stdin line out,
//! one JSON object per stdout line back. Reading the worker's stdout is
//! delegated to a fixed helper thread per §5 — it posts complete lines onto
//! a bounded channel that `send_request` blocks on, which is the one
//! "synchronous write followed by a bounded wait" the reactor is allowed
//! per handler (§5 Suspension points).

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use clove_core::Value;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Seam between the gateway and how a request actually reaches a worker
/// process, so tests substitute a fake without launching a real subprocess
/// (mirrors `clove-agent::AgentAdapter`).
pub trait LlmWorker: Send {
    fn send_request(&mut self, payload: &Value) -> Result<Value, LlmError>;
    fn is_alive(&mut self) -> bool;
}

enum ReaderMessage {
    Line(String),
    Eof,
    Err(std::io::Error),
}

/// A live worker subprocess plus its stdout reader thread.
pub struct SubprocessWorker {
    child: Child,
    stdin: ChildStdin,
    replies: Receiver<ReaderMessage>,
    _reader: thread::JoinHandle<()>,
}

/// Production handle alias kept for call sites that want a concrete type
/// name rather than the trait object the gateway stores internally.
pub type WorkerHandle = SubprocessWorker;

impl SubprocessWorker {
    pub fn spawn(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(LlmError::SpawnFailed)?;

        #[allow(clippy::expect_used)]
        let stdin = child.stdin.take().expect("stdin was piped");
        #[allow(clippy::expect_used)]
        let stdout = child.stdout.take().expect("stdout was piped");

        let (tx, rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next() {
                    Some(Ok(line)) => {
                        if tx.send(ReaderMessage::Line(line)).is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tx.send(ReaderMessage::Err(e));
                        break;
                    }
                    None => {
                        let _ = tx.send(ReaderMessage::Eof);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            child,
            stdin,
            replies: rx,
            _reader: reader,
        })
    }
}

impl LlmWorker for SubprocessWorker {
    fn send_request(&mut self, payload: &Value) -> Result<Value, LlmError> {
        let mut line = serde_json::to_string(payload).map_err(LlmError::MalformedResponse)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .map_err(LlmError::WriteFailed)?;
        self.stdin.flush().map_err(LlmError::WriteFailed)?;

        match self.replies.recv() {
            Ok(ReaderMessage::Line(raw)) => {
                serde_json::from_str(&raw).map_err(LlmError::MalformedResponse)
            }
            Ok(ReaderMessage::Eof) => Err(LlmError::WorkerDied("stdout closed (EOF)".to_string())),
            Ok(ReaderMessage::Err(e)) => Err(LlmError::WorkerDied(e.to_string())),
            Err(_) => Err(LlmError::WorkerDied("reader thread exited".to_string())),
        }
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for SubprocessWorker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
