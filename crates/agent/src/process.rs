// SPDX-License-Identifier: MIT

//! The seam between the lifecycle manager and actual OS process creation.
//! [`AgentAdapter`] lets [`crate::manager::AgentManager`] be generic over a
//! real sandbox-backed launcher in production and a fake one in tests,
//! mirroring the teacher's adapter-generic `Runtime<A, N, C>`.

use nix::sys::signal::Signal;

use clove_sandbox::{IsolationStatus, LaunchSpec, Sandbox, SandboxConfig, SandboxError};

use crate::spec::SpawnSpec;

/// A live (or exited) OS process backing one agent.
pub trait ProcessHandle: Send {
    fn os_pid(&self) -> u32;
    fn is_running(&mut self) -> bool;
    fn exit_code(&self) -> Option<i32>;
    fn isolation_status(&self) -> &IsolationStatus;
    fn send_signal(&self, signal: Signal) -> Result<(), SandboxError>;
    fn teardown(&self);
}

impl ProcessHandle for Sandbox {
    fn os_pid(&self) -> u32 {
        self.pid.as_raw() as u32
    }

    fn is_running(&mut self) -> bool {
        Sandbox::is_running(self)
    }

    fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    fn isolation_status(&self) -> &IsolationStatus {
        &self.status
    }

    fn send_signal(&self, signal: Signal) -> Result<(), SandboxError> {
        Sandbox::send_signal(self, signal)
    }

    fn teardown(&self) {
        Sandbox::teardown(self)
    }
}

/// Launches the OS process backing a [`SpawnSpec`].
pub trait AgentAdapter: Send + Sync {
    type Handle: ProcessHandle;

    fn spawn(&self, sandbox_name: &str, spec: &SpawnSpec) -> Result<Self::Handle, SandboxError>;
}

/// Production adapter: launches real sandboxed processes via `clove-sandbox`.
#[derive(Debug, Clone, Default)]
pub struct SandboxAdapter;

impl AgentAdapter for SandboxAdapter {
    type Handle = Sandbox;

    fn spawn(&self, sandbox_name: &str, spec: &SpawnSpec) -> Result<Sandbox, SandboxError> {
        let mut config = SandboxConfig::new(sandbox_name);
        config.enable_network = spec.network;
        config.limits = spec.limits.clone();
        config.force_unisolated = !spec.sandboxed;

        let launch = LaunchSpec {
            command: spec.script.clone(),
            args: spec.args.clone(),
            cwd: spec.cwd.clone(),
            env: spec.env.clone(),
        };

        Sandbox::spawn(&config, &launch)
    }
}
