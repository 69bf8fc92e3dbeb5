use super::*;

#[test]
fn create_is_idempotent_rejected_on_duplicate() {
    let mut worlds = WorldRegistry::new();
    worlds.create("forest").unwrap();
    assert_eq!(
        worlds.create("forest").unwrap_err(),
        WorldError::AlreadyExists("forest".to_string())
    );
}

#[test]
fn join_and_leave_update_membership() {
    let mut worlds = WorldRegistry::new();
    worlds.create("forest").unwrap();
    worlds.join("forest", AgentId(1)).unwrap();
    assert_eq!(worlds.list()[0].member_count, 1);
    worlds.leave("forest", AgentId(1)).unwrap();
    assert_eq!(worlds.list()[0].member_count, 0);
}

#[test]
fn operations_on_missing_world_fail() {
    let mut worlds = WorldRegistry::new();
    assert_eq!(
        worlds.join("nowhere", AgentId(1)).unwrap_err(),
        WorldError::NotFound("nowhere".to_string())
    );
    assert_eq!(
        worlds.state("nowhere").unwrap_err(),
        WorldError::NotFound("nowhere".to_string())
    );
}

#[test]
fn emit_event_requires_membership() {
    let mut worlds = WorldRegistry::new();
    worlds.create("forest").unwrap();
    assert_eq!(
        worlds.emit_event("forest", AgentId(1)).unwrap_err(),
        WorldError::NotMember("forest".to_string())
    );
    worlds.join("forest", AgentId(1)).unwrap();
    worlds.emit_event("forest", AgentId(1)).unwrap();
}

#[test]
fn snapshot_then_restore_round_trips_state() {
    let mut worlds = WorldRegistry::new();
    worlds.create("forest").unwrap();
    worlds
        .set_state("forest", serde_json::json!({"trees": 3}))
        .unwrap();
    let snap = worlds.snapshot("forest").unwrap();

    worlds
        .set_state("forest", serde_json::json!({"trees": 0}))
        .unwrap();
    worlds.restore("forest", snap).unwrap();
    assert_eq!(worlds.state("forest").unwrap(), serde_json::json!({"trees": 3}));
}

#[test]
fn destroy_removes_the_world() {
    let mut worlds = WorldRegistry::new();
    worlds.create("forest").unwrap();
    worlds.destroy("forest").unwrap();
    assert_eq!(
        worlds.destroy("forest").unwrap_err(),
        WorldError::NotFound("forest".to_string())
    );
}

#[test]
fn list_is_sorted_by_name() {
    let mut worlds = WorldRegistry::new();
    worlds.create("zeta").unwrap();
    worlds.create("alpha").unwrap();
    let names: Vec<_> = worlds.list().into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
}
