// SPDX-License-Identifier: MIT

use super::*;
use crate::preset::PermissionPreset;

fn record_with(f: impl FnOnce(&mut PermissionRecord)) -> PermissionRecord {
    let mut record = PermissionPreset::Standard.to_record();
    f(&mut record);
    record
}

#[test]
fn can_read_path_requires_capability_flag() {
    let record = record_with(|r| r.can_read = false);
    assert!(!record.can_read_path("/tmp/whatever"));
}

#[test]
fn can_read_path_denies_blocked_patterns() {
    let record = record_with(|_| {});
    assert!(!record.can_read_path("/etc/shadow"));
}

#[test]
fn can_read_path_allows_when_allow_list_empty_and_not_blocked() {
    let record = record_with(|_| {});
    assert!(record.can_read_path("/tmp/scratch/output.txt"));
}

#[test]
fn can_read_path_denies_outside_nonempty_allow_list() {
    let record = record_with(|r| r.allowed_read_paths = vec!["/tmp/*".to_string()]);
    assert!(record.can_read_path("/tmp/ok.txt"));
    assert!(!record.can_read_path("/var/log/syslog"));
}

#[test]
fn write_and_read_allow_lists_are_independent() {
    let record = PermissionPreset::Sandboxed.to_record();
    assert!(record.can_read_path("/home/agent/notes.txt"));
    assert!(!record.can_write_path("/home/agent/notes.txt"));
    assert!(record.can_write_path("/tmp/scratch.txt"));
}

#[yare::parameterized(
    blocked_by_literal = { "sudo rm -rf /", false },
    not_blocked         = { "ls -la /tmp", true },
)]
fn can_execute_command_respects_default_blocklist(cmd: &str, expected: bool) {
    let record = PermissionPreset::Standard.to_record();
    assert_eq!(record.can_execute_command(cmd), expected);
}

#[test]
fn can_access_domain_denies_without_capability() {
    let record = record_with(|r| {
        r.can_http = false;
        r.allowed_domains = vec!["example.com".to_string()];
    });
    assert!(!record.can_access_domain("https://example.com/"));
}

#[test]
fn can_access_domain_empty_allow_list_denies_all() {
    let record = record_with(|r| r.can_http = true);
    assert!(!record.can_access_domain("https://example.com/"));
}

#[test]
fn can_access_domain_matches_subdomain_wildcard() {
    let record = record_with(|r| {
        r.can_http = true;
        r.allowed_domains = vec!["*.example.com".to_string()];
    });
    assert!(record.can_access_domain("https://api.example.com/v1"));
    assert!(!record.can_access_domain("https://example.com/"));
}

#[test]
fn llm_quota_zero_means_unlimited() {
    let record = record_with(|r| {
        r.max_llm_calls = 0;
        r.max_llm_tokens = 0;
    });
    assert!(record.can_use_llm(1_000_000));
}

#[test]
fn llm_quota_denies_once_call_limit_reached() {
    let mut record = record_with(|r| r.max_llm_calls = 1);
    assert!(record.can_use_llm(10));
    record.record_llm_usage(10);
    assert!(!record.can_use_llm(10));
}

#[test]
fn llm_quota_denies_when_estimate_would_exceed_token_budget() {
    let record = record_with(|r| r.max_llm_tokens = 100);
    assert!(record.can_use_llm(100));
    assert!(!record.can_use_llm(101));
}

#[test]
fn llm_usage_is_monotonically_non_decreasing() {
    let mut record = record_with(|_| {});
    record.record_llm_usage(50);
    let after_first = record.llm_tokens_used;
    record.record_llm_usage(0);
    assert!(record.llm_tokens_used >= after_first);
}
