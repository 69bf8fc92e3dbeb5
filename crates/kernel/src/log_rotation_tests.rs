// SPDX-License-Identifier: MIT

use super::*;
use std::io::Read;

fn write_file(path: &std::path::Path, bytes: &[u8]) {
    std::fs::write(path, bytes).unwrap();
}

fn read_file(path: &std::path::Path) -> Vec<u8> {
    let mut buf = Vec::new();
    std::fs::File::open(path).unwrap().read_to_end(&mut buf).unwrap();
    buf
}

#[test]
fn rotate_is_a_noop_below_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("cloved.log");
    write_file(&log, b"small");

    rotate_log_if_needed(&log, 1024, 3);

    assert_eq!(read_file(&log), b"small");
    assert!(!dir.path().join("cloved.log.1").exists());
}

#[test]
fn rotate_moves_oversized_log_into_generation_one() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("cloved.log");
    write_file(&log, b"big content");

    rotate_log_if_needed(&log, 4, 3);

    assert!(!log.exists());
    assert_eq!(read_file(&dir.path().join("cloved.log.1")), b"big content");
}

#[test]
fn rotate_shifts_existing_generations_and_drops_the_oldest() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("cloved.log");
    write_file(&log, b"newest");
    write_file(&dir.path().join("cloved.log.1"), b"gen1");
    write_file(&dir.path().join("cloved.log.2"), b"gen2");
    write_file(&dir.path().join("cloved.log.3"), b"gen3-should-be-dropped");

    rotate_log_if_needed(&log, 1, 3);

    assert_eq!(read_file(&dir.path().join("cloved.log.1")), b"newest");
    assert_eq!(read_file(&dir.path().join("cloved.log.2")), b"gen1");
    assert_eq!(read_file(&dir.path().join("cloved.log.3")), b"gen2");
}

#[test]
fn missing_log_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("does-not-exist.log");
    rotate_log_if_needed(&log, 1, 3);
    assert!(!log.exists());
}

#[test]
fn startup_marker_is_appended_with_pid() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("cloved.log");

    write_startup_marker(&log);
    let contents = String::from_utf8(read_file(&log)).unwrap();

    assert!(contents.starts_with("--- cloved: starting (pid: "));
    assert!(contents.contains(&std::process::id().to_string()));

    write_startup_marker(&log);
    let contents = String::from_utf8(read_file(&log)).unwrap();
    assert_eq!(contents.matches("--- cloved: starting").count(), 2);
}
