// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn register_then_resolve() {
    let mut r = NameRegistry::new();
    r.register(AgentId(1), "alice".into()).unwrap();
    assert_eq!(r.resolve("alice"), Some(AgentId(1)));
    assert_eq!(r.name_of(AgentId(1)), Some("alice"));
}

#[test]
fn re_registering_same_name_by_same_agent_is_ok() {
    let mut r = NameRegistry::new();
    r.register(AgentId(1), "alice".into()).unwrap();
    r.register(AgentId(1), "alice".into()).unwrap();
}

#[test]
fn registering_a_taken_name_fails() {
    let mut r = NameRegistry::new();
    r.register(AgentId(1), "alice".into()).unwrap();
    let err = r.register(AgentId(2), "alice".into()).unwrap_err();
    assert!(matches!(err, IpcError::NameTaken(_)));
}

#[test]
fn re_registering_releases_old_name() {
    let mut r = NameRegistry::new();
    r.register(AgentId(1), "alice".into()).unwrap();
    r.register(AgentId(1), "bob".into()).unwrap();
    assert_eq!(r.resolve("alice"), None);
    assert_eq!(r.resolve("bob"), Some(AgentId(1)));
}

#[test]
fn remove_releases_binding() {
    let mut r = NameRegistry::new();
    r.register(AgentId(1), "alice".into()).unwrap();
    r.remove(AgentId(1));
    assert_eq!(r.resolve("alice"), None);
    assert_eq!(r.name_of(AgentId(1)), None);
}
