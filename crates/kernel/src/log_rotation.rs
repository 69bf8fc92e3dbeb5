// SPDX-License-Identifier: MIT

//! Startup-time log rotation and the startup marker line (§11/§12 Ambient
//! Stack: "Clove's kernel log gets the same treatment [as the teacher's
//! daemon log], same thresholds (10 MiB, 3 rotations)"). Rotation happens
//! once, before every run, not continuously mid-run — matching the
//! teacher's `rotate_log_if_needed` being called at daemon startup rather
//! than wired into the writer itself.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Rotate the log file past this size before a new run starts.
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Keep at most this many rotated generations (`.1` through `.3`).
pub const MAX_LOG_ROTATIONS: u32 = 3;

/// If `path` exists and is at or over `max_bytes`, shift `path.1..path.N`
/// up by one generation (dropping anything past `max_rotations`) and move
/// the current log into `path.1`. A missing log file is not an error —
/// there is nothing to rotate on a fresh socket path.
pub fn rotate_log_if_needed(path: &Path, max_bytes: u64, max_rotations: u32) {
    let Ok(metadata) = std::fs::metadata(path) else {
        return;
    };
    if metadata.len() < max_bytes {
        return;
    }

    let oldest = generation_path(path, max_rotations);
    let _ = std::fs::remove_file(&oldest);

    let mut gen = max_rotations;
    while gen > 1 {
        let from = generation_path(path, gen - 1);
        let to = generation_path(path, gen);
        let _ = std::fs::rename(&from, &to);
        gen -= 1;
    }

    let _ = std::fs::rename(path, generation_path(path, 1));
}

fn generation_path(path: &Path, generation: u32) -> std::path::PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{generation}"));
    path.with_file_name(name)
}

/// Append `--- cloved: starting (pid: N) ---` plus a blank line to the log
/// file before the tracing subscriber is installed, so a crash during
/// subscriber/reactor init is still visible in the log (§12).
pub fn write_startup_marker(path: &Path) {
    let pid = std::process::id();
    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "--- cloved: starting (pid: {pid}) ---\n");
}

#[cfg(test)]
#[path = "log_rotation_tests.rs"]
mod tests;
