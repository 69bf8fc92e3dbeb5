// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use clove_sandbox::ResourceLimits;

use crate::restart::RestartConfig;

/// The saved form of a `SPAWN` payload (§4.5), kept verbatim so the restart
/// scheduler can replay it later without the caller's involvement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub name: Option<String>,
    pub script: String,
    pub args: Vec<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: Vec<(String, String)>,
    #[serde(default = "default_true")]
    pub sandboxed: bool,
    #[serde(default = "default_true")]
    pub network: bool,
    #[serde(default)]
    pub limits: ResourceLimits,
    #[serde(default)]
    pub restart: Option<RestartConfig>,
}

fn default_true() -> bool {
    true
}
