// SPDX-License-Identifier: MIT

//! Agent lifecycle management: spawn/stop/pause/resume over a sandboxed
//! process, restart scheduling with exponential backoff, and the
//! adapter seam that keeps the reactor generic over how a process actually
//! gets launched (§4.5).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod agent;
mod error;
mod manager;
mod process;
mod restart;
mod spec;
mod state;

pub use agent::{Agent, AgentSummary};
pub use error::{AgentError, AgentIdOrName};
pub use manager::{AgentLifecycleEvent, AgentManager};
pub use process::{AgentAdapter, ProcessHandle, SandboxAdapter};
pub use restart::{PendingRestart, RestartConfig, RestartPolicy, RestartState};
pub use spec::SpawnSpec;
pub use state::AgentState;
