// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Permission denied: {0}")]
    Denied(String),

    #[error("elevation required: only {agent_id} may set its own permissions without can_spawn")]
    ElevationRequired { agent_id: u32 },

    #[error("invalid permission payload: {0}")]
    InvalidPayload(String),
}
