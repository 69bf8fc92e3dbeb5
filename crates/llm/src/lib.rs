// SPDX-License-Identifier: MIT

//! The LLM gateway (§4.11): a single long-lived worker subprocess speaking
//! one JSON object per line on stdin/stdout, serialized so every agent's
//! `THINK` call queues FIFO through one in-flight request. The worker is an
//! opaque collaborator — the kernel imposes only the serialization and
//! worker-death recovery described below.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod config;
mod error;
mod gateway;
mod request;
mod worker;

pub use config::LlmConfig;
pub use error::LlmError;
pub use gateway::LlmGateway;
pub use request::{ThinkRequest, ThinkResponse};
pub use worker::{SubprocessWorker, WorkerHandle};
