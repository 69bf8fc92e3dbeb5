// SPDX-License-Identifier: MIT

//! Kernel configuration, assembled defaults -> `.env` -> process environment
//! (§11 Ambient Stack), one small free function per variable rather than a
//! single struct-from-env macro, matching the teacher's `daemon/src/env.rs`.

use std::path::{Path, PathBuf};
use std::time::Duration;

mod dotenv;

pub use dotenv::load_dotenv;

/// Default Unix socket path (§6): "A local stream socket at a configurable
/// path (default `/tmp/clove.sock`)."
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/clove.sock";

/// Assembled, precedence-resolved runtime configuration (§11 Glossary
/// Addendum).
#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub socket_path: PathBuf,
    pub log_path: Option<PathBuf>,
    /// Default `KILL` escalation timeout (§4.5): 5 000 ms.
    pub stop_timeout: Duration,
    pub llm_command: String,
    pub llm_model: String,
    pub audit_max_entries: usize,
    pub mailbox_capacity: usize,
    pub event_queue_capacity: usize,
    /// `GEMINI_API_KEY`/`GOOGLE_API_KEY` forwarded to the LLM worker's
    /// environment rather than read by the kernel itself (§6).
    pub llm_api_key: Option<String>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            log_path: None,
            stop_timeout: Duration::from_millis(5_000),
            llm_command: "llm_service".to_string(),
            llm_model: "gemini-1.5-flash".to_string(),
            audit_max_entries: clove_audit::DEFAULT_MAX_AUDIT_ENTRIES,
            mailbox_capacity: clove_ipc::DEFAULT_MAILBOX_CAPACITY,
            event_queue_capacity: clove_events::DEFAULT_QUEUE_CAPACITY,
            llm_api_key: None,
        }
    }
}

impl KernelConfig {
    /// Build the configuration: start from defaults, load the first `.env`
    /// found along the search order (§6), then let the process environment
    /// (which already implicitly includes anything the caller exported
    /// before invoking us) override everything. `socket_arg` is the CLI's
    /// optional positional socket-path argument, which wins over both.
    pub fn load(socket_arg: Option<PathBuf>) -> Self {
        load_dotenv();

        let mut config = Self::default();

        if let Some(path) = socket_arg {
            config.socket_path = path;
        } else if let Ok(path) = std::env::var("CLOVE_SOCKET_PATH") {
            config.socket_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("CLOVE_LOG_PATH") {
            config.log_path = Some(PathBuf::from(path));
        }

        if let Some(ms) = env_u64("CLOVE_STOP_TIMEOUT_MS") {
            config.stop_timeout = Duration::from_millis(ms);
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.llm_model = model;
        }

        if let Some(n) = env_usize("CLOVE_AUDIT_MAX_ENTRIES") {
            config.audit_max_entries = n;
        }
        if let Some(n) = env_usize("CLOVE_MAILBOX_CAPACITY") {
            config.mailbox_capacity = n;
        }
        if let Some(n) = env_usize("CLOVE_EVENT_QUEUE_CAPACITY") {
            config.event_queue_capacity = n;
        }

        config.llm_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());

        config
    }

    pub fn llm_config(&self) -> clove_llm::LlmConfig {
        clove_llm::LlmConfig {
            command: self.llm_command.clone(),
            args: Vec::new(),
            default_model: self.llm_model.clone(),
            default_temperature: 0.7,
            default_max_tokens: 2048,
        }
    }

    /// Where the socket's stale-instance guard and log rotation look for a
    /// sibling pid marker, kept next to the socket rather than in a fixed
    /// state directory since this kernel persists nothing else (§6).
    pub fn pid_marker_path(&self) -> PathBuf {
        sibling_with_extension(&self.socket_path, "pid")
    }
}

fn sibling_with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
