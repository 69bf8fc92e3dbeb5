// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to spawn LLM worker: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("LLM worker died: {0}")]
    WorkerDied(String),

    #[error("failed to write request to worker stdin: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("failed to parse worker response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("worker reported an error: {0}")]
    WorkerError(String),
}
