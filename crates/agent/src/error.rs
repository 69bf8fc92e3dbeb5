// SPDX-License-Identifier: MIT

use clove_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("name {0:?} is already registered to a live agent")]
    DuplicateName(String),

    #[error("no such agent: {0}")]
    NotFound(AgentIdOrName),

    #[error("agent {0} is {1:?}, which does not permit this operation")]
    InvalidTransition(AgentId, crate::state::AgentState),

    #[error("spawn failed: {0}")]
    SpawnFailed(#[source] clove_sandbox::SandboxError),

    #[error("signal delivery failed: {0}")]
    SignalFailed(#[source] clove_sandbox::SandboxError),
}

/// Either form a caller may address an agent by, kept for error messages.
#[derive(Debug, Clone)]
pub enum AgentIdOrName {
    Id(AgentId),
    Name(String),
}

impl std::fmt::Display for AgentIdOrName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentIdOrName::Id(id) => write!(f, "id {id}"),
            AgentIdOrName::Name(name) => write!(f, "name {name:?}"),
        }
    }
}
