// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn star_does_not_cross_path_separator() {
    assert!(path_glob_matches("/tmp/*", "/tmp/agent-1.sock"));
    assert!(!path_glob_matches("/tmp/*", "/tmp/nested/agent-1.sock"));
}

#[test]
fn double_star_crosses_path_separator() {
    assert!(path_glob_matches("/tmp/**", "/tmp/nested/deep/file"));
}

#[test]
#[serial_test::serial]
fn tilde_expands_to_home() {
    std::env::set_var("HOME", "/home/agentuser");
    assert!(path_glob_matches("~/.ssh/*", "/home/agentuser/.ssh/id_rsa"));
    assert!(!path_glob_matches("~/.ssh/*", "/home/otheruser/.ssh/id_rsa"));
}

#[test]
fn command_blocked_checks_substring_anywhere() {
    assert!(command_blocked(&["sudo".to_string()], "sudo rm -rf /tmp"));
    assert!(command_blocked(
        &["rm -rf /".to_string()],
        "cd /tmp && rm -rf / --no-preserve-root"
    ));
    assert!(!command_blocked(&["sudo".to_string()], "ls -la"));
}

#[test]
fn command_allowed_empty_list_allows_everything() {
    assert!(command_allowed(&[], "anything goes"));
}

#[test]
fn command_allowed_checks_prefix_only() {
    let allowed = vec!["git ".to_string()];
    assert!(command_allowed(&allowed, "git status"));
    assert!(!command_allowed(&allowed, "echo git status"));
}

#[test]
fn extract_domain_strips_scheme_path_and_port() {
    assert_eq!(extract_domain("https://api.example.com:8443/v1/x"), "api.example.com");
    assert_eq!(extract_domain("example.com"), "example.com");
    assert_eq!(extract_domain("http://example.com"), "example.com");
}

#[test]
fn domain_matches_exact() {
    assert!(domain_matches("example.com", "example.com"));
    assert!(!domain_matches("example.com", "sub.example.com"));
}

#[test]
fn domain_matches_strict_subdomain_suffix_only() {
    assert!(domain_matches("*.example.com", "api.example.com"));
    assert!(domain_matches("*.example.com", "deep.api.example.com"));
    assert!(!domain_matches("*.example.com", "example.com"));
    assert!(!domain_matches("*.example.com", "evilexample.com"));
}
