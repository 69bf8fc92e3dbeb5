// SPDX-License-Identifier: MIT

//! Signal-to-shutdown-flag shim (§9 Design Notes): "the signal handler in
//! the source uses a file-scope kernel pointer; a clean redesign installs a
//! small signal-to-shutdown-flag shim whose only state is an atomic
//! boolean, checked each reactor tick — no globals, no race with subsystem
//! construction/destruction."

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::sys::signal::{self, SigHandler, Signal};

use crate::error::KernelError;

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn request_shutdown(_signal: std::os::raw::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// A cheap `Clone`-able handle onto the process-wide shutdown flag. The
/// static itself is the only piece of global state the kernel carries —
/// signal handlers cannot close over anything richer than a C function
/// pointer, so there is no way to avoid it entirely, but every consumer
/// reaches it through this handle rather than touching the static directly.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag;

impl ShutdownFlag {
    pub fn is_set(&self) -> bool {
        SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub(crate) fn reset_for_test(&self) {
        SHUTDOWN_REQUESTED.store(false, Ordering::SeqCst);
    }
}

/// Install `SIGINT`/`SIGTERM` handlers that flip [`ShutdownFlag`], and
/// ignore `SIGPIPE` (§6 CLI surface) so a client disconnecting mid-write
/// never takes the kernel down.
pub fn install() -> Result<Arc<ShutdownFlag>, KernelError> {
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(request_shutdown))
            .map_err(KernelError::SignalInstall)?;
        signal::signal(Signal::SIGTERM, SigHandler::Handler(request_shutdown))
            .map_err(KernelError::SignalInstall)?;
        signal::signal(Signal::SIGPIPE, SigHandler::SigIgn).map_err(KernelError::SignalInstall)?;
    }
    Ok(Arc::new(ShutdownFlag))
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
