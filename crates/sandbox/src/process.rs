// SPDX-License-Identifier: MIT

//! Raw process creation: the privileged clone-based namespace entry and its
//! unprivileged fork+exec fallback (§4.6).

use std::ffi::CString;
use std::os::fd::{IntoRawFd, RawFd};
use std::path::PathBuf;

use nix::mount::{mount, MsFlags};
use nix::sched::{clone, CloneFlags};
use nix::sys::signal::Signal;
use nix::unistd::{self, execvp, ForkResult, Pid};

use crate::error::SandboxError;

/// Everything needed to launch the target command, independent of sandbox
/// policy.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

/// Outcome of the low-level launch: the child pid and which namespaces it
/// actually entered.
pub struct Launched {
    pub pid: Pid,
    pub pid_ns: bool,
    pub mount_ns: bool,
    pub uts_ns: bool,
    pub net_ns: bool,
}

const CHILD_STACK_SIZE: usize = 1024 * 1024;

/// Attempt the privileged path: clone into new PID/mount/UTS (and, if
/// `want_net_ns`, network) namespaces atomically with child creation. The
/// child blocks on `sync_read_fd` until the parent releases it (after the
/// parent has finished attaching the pid to its cgroup), then sets its
/// hostname, mounts a private `/proc`, and execs the target command.
///
/// Returns `Err` if `clone` itself fails (typically `EPERM` without
/// `CAP_SYS_ADMIN`); the caller should fall back to [`fork_spawn`].
pub fn clone_spawn(
    spec: &LaunchSpec,
    sandbox_name: &str,
    want_net_ns: bool,
    sync_read_fd: RawFd,
) -> Result<Launched, SandboxError> {
    let mut flags = CloneFlags::CLONE_NEWPID | CloneFlags::CLONE_NEWNS | CloneFlags::CLONE_NEWUTS;
    if want_net_ns {
        flags |= CloneFlags::CLONE_NEWNET;
    }

    let spec = spec.clone();
    let name = sandbox_name.to_string();

    let mut stack = vec![0u8; CHILD_STACK_SIZE];
    let callback = Box::new(move || -> isize { child_entry(&spec, &name, true, true, true, sync_read_fd) });

    // SAFETY: `clone` immediately runs `callback` in the new child; the
    // stack buffer outlives the call (it is dropped only after `clone`
    // returns in the parent, by which point the child has its own address
    // space), and the child path never returns to Rust code that could
    // unwind across the FFI boundary — it either execs or calls `_exit`.
    let pid = unsafe { clone(callback, &mut stack, flags, Some(libc::SIGCHLD)) }
        .map_err(SandboxError::Clone)?;

    Ok(Launched {
        pid,
        pid_ns: true,
        mount_ns: true,
        uts_ns: true,
        net_ns: want_net_ns,
    })
}

/// The degraded path: a plain `fork` with no namespace isolation. Used when
/// [`clone_spawn`] fails, or whenever the kernel lacks `CAP_SYS_ADMIN`.
pub fn fork_spawn(spec: &LaunchSpec, sync_read_fd: RawFd) -> Result<Launched, SandboxError> {
    // SAFETY: the child immediately blocks on the sync pipe and then either
    // execs or calls `_exit`; no Rust destructors run across the fork in a
    // way that could double-free shared state, since the child never
    // returns into the caller's stack frame.
    match unsafe { unistd::fork() }.map_err(SandboxError::Fork)? {
        ForkResult::Parent { child } => Ok(Launched {
            pid: child,
            pid_ns: false,
            mount_ns: false,
            uts_ns: false,
            net_ns: false,
        }),
        ForkResult::Child => {
            let code = child_entry(spec, "", false, false, false, sync_read_fd);
            // child_entry only returns on exec failure.
            std::process::exit(code as i32);
        }
    }
}

/// Runs inside the cloned/forked child. Blocks on the sync pipe, applies
/// whatever namespace-dependent setup it was told succeeded, then execs.
/// Returns only if `execvp` fails (the caller must `_exit` immediately in
/// that case — this function never panics and never allocates after the
/// point where `_exit` would be required, except for the `CString`
/// conversions needed for `execvp` itself).
fn child_entry(
    spec: &LaunchSpec,
    sandbox_name: &str,
    entered_uts_ns: bool,
    entered_pid_ns: bool,
    entered_mount_ns: bool,
    sync_read_fd: RawFd,
) -> isize {
    let mut byte = [0u8; 1];
    // Block until the parent has attached us to the cgroup. Ignore the
    // result: if the parent died before signaling, proceed anyway rather
    // than hanging forever — the agent will simply run outside the cgroup.
    let _ = nix::unistd::read(sync_read_fd, &mut byte);
    let _ = nix::unistd::close(sync_read_fd);

    if entered_uts_ns && !sandbox_name.is_empty() {
        let _ = nix::unistd::sethostname(sandbox_name);
    }

    if entered_pid_ns && entered_mount_ns {
        let _ = mount(
            Some("proc"),
            "/proc",
            Some("proc"),
            MsFlags::MS_NOSUID | MsFlags::MS_NOEXEC | MsFlags::MS_NODEV,
            None::<&str>,
        );
    }

    if let Some(cwd) = &spec.cwd {
        let _ = nix::unistd::chdir(cwd);
    }

    for (key, value) in &spec.env {
        std::env::set_var(key, value);
    }

    let Ok(program) = CString::new(spec.command.as_str()) else {
        return exit_child(127);
    };
    let mut c_args = Vec::with_capacity(spec.args.len() + 1);
    c_args.push(program.clone());
    for arg in &spec.args {
        match CString::new(arg.as_str()) {
            Ok(c) => c_args.push(c),
            Err(_) => return exit_child(127),
        }
    }

    match execvp(&program, &c_args) {
        Ok(_) => unreachable!("execvp only returns on failure"),
        Err(e) => {
            eprintln!("clove-sandbox: execvp({}) failed: {e}", spec.command);
            exit_child(127)
        }
    }
}

fn exit_child(code: i32) -> isize {
    // SAFETY: called only on the child's exec-failure path, never after
    // returning control to shared Rust state.
    unsafe { libc::_exit(code) };
}

/// Create the parent/child ends of a pipe used to hold the child at the
/// start of its entry point until the parent has finished cgroup setup.
pub fn sync_pipe() -> Result<(RawFd, RawFd), SandboxError> {
    let (read_end, write_end) = nix::unistd::pipe().map_err(SandboxError::Pipe)?;
    Ok((read_end.into_raw_fd(), write_end.into_raw_fd()))
}

/// Release the child from [`sync_pipe`]'s read end.
pub fn release(write_fd: RawFd) {
    let _ = nix::unistd::write(unsafe { std::os::fd::BorrowedFd::borrow_raw(write_fd) }, &[1u8]);
    let _ = nix::unistd::close(write_fd);
}

/// Send `signal` to `pid`. Used by pause/resume (`SIGSTOP`/`SIGCONT`) and
/// stop escalation (`SIGTERM`/`SIGKILL`).
pub fn signal(pid: Pid, signal: Signal) -> Result<(), SandboxError> {
    nix::sys::signal::kill(pid, signal).map_err(SandboxError::Signal)
}
