use super::*;
use std::os::unix::net::UnixListener;

#[test]
fn acquires_cleanly_when_nothing_is_running() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("clove.sock");
    let pid_path = dir.path().join("clove.sock.pid");

    let guard = acquire(&socket_path, &pid_path);
    assert!(guard.is_ok());
    assert!(pid_path.exists());
}

#[test]
fn removes_a_stale_socket_with_no_listener() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("clove.sock");
    let pid_path = dir.path().join("clove.sock.pid");

    {
        let listener = UnixListener::bind(&socket_path).unwrap();
        drop(listener);
    }
    assert!(socket_path.exists());

    let guard = acquire(&socket_path, &pid_path);
    assert!(guard.is_ok());
}

#[test]
fn refuses_when_something_is_listening_on_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("clove.sock");
    let pid_path = dir.path().join("clove.sock.pid");

    let _listener = UnixListener::bind(&socket_path).unwrap();

    let result = acquire(&socket_path, &pid_path);
    assert!(matches!(result, Err(KernelError::AlreadyRunning(_))));
}

#[test]
fn refuses_a_second_lock_on_the_same_pid_marker() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("clove.sock");
    let pid_path = dir.path().join("clove.sock.pid");

    let _first = acquire(&socket_path, &pid_path).unwrap();
    let second = acquire(&socket_path, &pid_path);
    assert!(matches!(second, Err(KernelError::AlreadyRunning(_))));
}
