// SPDX-License-Identifier: MIT

//! Glob-style path matching, substring/prefix command matching, and
//! subdomain-suffix domain matching. Path globs use `globset` with
//! `literal_separator` so `*` never crosses a `/`, matching the shell
//! semantics the permission engine promises callers.

use std::env;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;

/// Expand a leading `~` to `$HOME`. Only a leading `~` is special; `~`
/// appearing elsewhere in a pattern is left alone.
pub fn expand_home(pattern: &str) -> String {
    if let Some(rest) = pattern.strip_prefix('~') {
        if let Ok(home) = env::var("HOME") {
            return format!("{home}{rest}");
        }
    }
    pattern.to_string()
}

/// Canonicalize `path` for matching against permission patterns. If the
/// path exists, canonicalize it outright; otherwise canonicalize its parent
/// (which usually does exist) and re-join the final component, so a glob
/// check against a not-yet-created file still resolves symlinks and `..` in
/// the part of the path that does exist.
pub fn canonicalize_for_match(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(resolved_parent) => resolved_parent.join(name),
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// `true` iff `path` matches the glob `pattern`, where `*` does not cross a
/// path separator (`**` does). A leading `~` in the pattern is expanded to
/// `$HOME` first.
pub fn path_glob_matches(pattern: &str, path: &str) -> bool {
    let expanded = expand_home(pattern);
    let Ok(glob) = GlobBuilder::new(&expanded)
        .literal_separator(true)
        .build()
    else {
        return false;
    };
    glob.compile_matcher().is_match(path)
}

/// `true` iff any pattern in `blocked` substring-matches `cmd`.
pub fn command_blocked(blocked: &[String], cmd: &str) -> bool {
    blocked.iter().any(|pattern| cmd.contains(pattern.as_str()))
}

/// `true` iff `allowed` is empty, or some entry is a prefix of `cmd`.
pub fn command_allowed(allowed: &[String], cmd: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|prefix| cmd.starts_with(prefix.as_str()))
}

/// Strip scheme, path, and port from a URL, returning just the host.
/// Best-effort: callers that pass an already-bare hostname get it back
/// unchanged.
pub fn extract_domain(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host_and_port = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    host_and_port.split(':').next().unwrap_or(host_and_port).to_string()
}

/// `true` iff `domain` matches `pattern`. A pattern of the form `*.x.y`
/// matches any strict subdomain suffix `.x.y` — it does not match the bare
/// domain `x.y` itself. Any other pattern must match exactly.
pub fn domain_matches(pattern: &str, domain: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(suffix) => {
            domain.ends_with(suffix) && domain.len() > suffix.len() && domain.as_bytes()[domain.len() - suffix.len() - 1] == b'.'
        }
        None => pattern == domain,
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
