// SPDX-License-Identifier: MIT

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn socket_arg_wins_over_everything_else() {
    std::env::set_var("CLOVE_SOCKET_PATH", "/tmp/from-env.sock");
    let config = KernelConfig::load(Some(PathBuf::from("/tmp/from-arg.sock")));
    assert_eq!(config.socket_path, PathBuf::from("/tmp/from-arg.sock"));
    std::env::remove_var("CLOVE_SOCKET_PATH");
}

#[test]
#[serial]
fn env_var_overrides_default_socket_path() {
    std::env::set_var("CLOVE_SOCKET_PATH", "/tmp/from-env.sock");
    let config = KernelConfig::load(None);
    assert_eq!(config.socket_path, PathBuf::from("/tmp/from-env.sock"));
    std::env::remove_var("CLOVE_SOCKET_PATH");
}

#[test]
#[serial]
fn default_socket_path_is_used_absent_any_override() {
    std::env::remove_var("CLOVE_SOCKET_PATH");
    let config = KernelConfig::load(None);
    assert_eq!(config.socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
}

#[test]
#[serial]
fn llm_api_key_prefers_gemini_over_google() {
    std::env::set_var("GEMINI_API_KEY", "gemini-key");
    std::env::set_var("GOOGLE_API_KEY", "google-key");
    let config = KernelConfig::load(None);
    assert_eq!(config.llm_api_key.as_deref(), Some("gemini-key"));
    std::env::remove_var("GEMINI_API_KEY");
    std::env::remove_var("GOOGLE_API_KEY");
}

#[test]
fn pid_marker_path_sits_next_to_the_socket() {
    let mut config = KernelConfig::default();
    config.socket_path = PathBuf::from("/tmp/clove.sock");
    assert_eq!(config.pid_marker_path(), PathBuf::from("/tmp/clove.sock.pid"));
}
