// SPDX-License-Identifier: MIT

//! `.env` search and parsing (§6): "the kernel searches for a file named
//! `.env` in, in order: current directory, executable directory, executable
//! directory's parent, executable directory's grandparent, two levels above
//! CWD. The first match is parsed... Variables already present in the
//! environment are not overwritten."

use std::path::PathBuf;

/// Find and load the first `.env` found along the search order, setting any
/// variable not already present in the process environment. A no-op if none
/// of the candidate paths exist.
pub fn load_dotenv() {
    if let Some(path) = find_dotenv() {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            apply_dotenv(&contents);
        }
    }
}

fn find_dotenv() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()));

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(cwd) = &cwd {
        candidates.push(cwd.join(".env"));
    }
    if let Some(exe_dir) = &exe_dir {
        candidates.push(exe_dir.join(".env"));
        if let Some(parent) = exe_dir.parent() {
            candidates.push(parent.join(".env"));
            if let Some(grandparent) = parent.parent() {
                candidates.push(grandparent.join(".env"));
            }
        }
    }
    if let Some(cwd) = &cwd {
        if let Some(up_one) = cwd.parent() {
            if let Some(up_two) = up_one.parent() {
                candidates.push(up_two.join(".env"));
            }
        }
    }

    candidates.into_iter().find(|p| p.is_file())
}

/// Parse `KEY=VALUE` lines, `#`-comments, and optional surrounding quotes on
/// the value (§6). Sets each key via `std::env::set_var` only if it is not
/// already present in the process environment.
fn apply_dotenv(contents: &str) {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || std::env::var_os(key).is_some() {
            continue;
        }
        let value = unquote(value.trim());
        // SAFETY-equivalent: single-threaded startup path, before the
        // reactor or any helper thread exists.
        std::env::set_var(key, value);
    }
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote("\"value\""), "value");
        assert_eq!(unquote("'value'"), "value");
        assert_eq!(unquote("value"), "value");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
    }

    #[test]
    fn apply_dotenv_skips_comments_and_blank_lines() {
        std::env::remove_var("CLOVE_TEST_DOTENV_A");
        apply_dotenv("# a comment\n\nCLOVE_TEST_DOTENV_A=hello\n");
        assert_eq!(std::env::var("CLOVE_TEST_DOTENV_A").as_deref(), Ok("hello"));
        std::env::remove_var("CLOVE_TEST_DOTENV_A");
    }

    #[test]
    fn apply_dotenv_never_overwrites_existing_var() {
        std::env::set_var("CLOVE_TEST_DOTENV_B", "original");
        apply_dotenv("CLOVE_TEST_DOTENV_B=overwritten\n");
        assert_eq!(std::env::var("CLOVE_TEST_DOTENV_B").as_deref(), Ok("original"));
        std::env::remove_var("CLOVE_TEST_DOTENV_B");
    }
}
