//! Full-stack tests for the role tag.
//!
//! These tests exercise the bundled handlers through the engine, not
//! in isolation: zones come from a provider, positions from a
//! scripted source, and role changes land in a recording backend.

use std::time::{Duration, Instant};

use cordon_core::AgentId;
use cordon_tags::{register_builtin, RoleService, SharedRoleService};
use cordon_test_utils::{shared_roles, ScriptedPositions, StaticProvider};
use cordon_tracker::{TrackerConfig, ZoneEngine};
use cordon_zone::{ZoneBuilder, ZoneRecord};

fn hospital() -> ZoneRecord {
    ZoneBuilder::new("Hospital")
        .position(0.0, 0.0)
        .circle(20.0)
        .tag("#role$medic")
        .finish()
        .unwrap()
}

fn engine_with(records: Vec<ZoneRecord>, roles: SharedRoleService) -> ZoneEngine {
    let mut engine = ZoneEngine::new(TrackerConfig::default()).unwrap();
    register_builtin(engine.registry_mut(), roles);
    engine
        .reload(&mut StaticProvider::with_records(records))
        .unwrap();
    engine
}

#[test]
fn role_follows_zone_membership() {
    let (roles, shared) = shared_roles();
    let mut engine = engine_with(vec![hospital()], shared);
    let medic = AgentId(1);
    engine.connect(medic);

    let mut positions = ScriptedPositions::new();
    positions.place(medic, 0.0, 0.0, 0.0);
    let t0 = Instant::now();
    engine.poll(&positions, t0);
    assert!(roles.lock().unwrap().has_role(medic, "medic"));

    positions.place(medic, 100.0, 0.0, 0.0);
    engine.poll(&positions, t0 + Duration::from_millis(300));
    assert!(!roles.lock().unwrap().has_role(medic, "medic"));

    let log = roles.lock().unwrap().log().to_vec();
    assert_eq!(log, vec!["create:medic", "add:1:medic", "remove:1:medic"]);
}

#[test]
fn disconnect_revokes_the_role() {
    let (roles, shared) = shared_roles();
    let mut engine = engine_with(vec![hospital()], shared);
    let medic = AgentId(1);
    engine.connect(medic);

    let mut positions = ScriptedPositions::new();
    positions.place(medic, 0.0, 0.0, 0.0);
    engine.poll(&positions, Instant::now());
    assert!(roles.lock().unwrap().has_role(medic, "medic"));

    engine.disconnect(medic);
    assert!(!roles.lock().unwrap().has_role(medic, "medic"));
}

#[test]
fn blacklisted_group_is_exempt_through_the_engine() {
    let record = ZoneBuilder::new("Hospital")
        .position(0.0, 0.0)
        .circle(20.0)
        .tag("#role@staff!$medic")
        .finish()
        .unwrap();

    let (roles, shared) = shared_roles();
    let staff = AgentId(1);
    let visitor = AgentId(2);
    {
        let mut r = roles.lock().unwrap();
        r.preload_role("staff");
        r.preload_member(staff, "staff");
    }
    let mut engine = engine_with(vec![record], shared);
    engine.connect(staff);
    engine.connect(visitor);

    let mut positions = ScriptedPositions::new();
    positions.place(staff, 0.0, 0.0, 0.0);
    positions.place(visitor, 5.0, 0.0, 0.0);
    engine.poll(&positions, Instant::now());

    let r = roles.lock().unwrap();
    assert!(!r.has_role(staff, "medic"));
    assert!(r.has_role(visitor, "medic"));
}

#[test]
fn inverted_zone_revokes_inside_and_grants_outside() {
    let record = ZoneBuilder::new("Sanctuary")
        .position(0.0, 0.0)
        .circle(20.0)
        .tag("#role!$outlaw")
        .finish()
        .unwrap();

    let (roles, shared) = shared_roles();
    let agent = AgentId(1);
    roles.lock().unwrap().preload_member(agent, "outlaw");
    let mut engine = engine_with(vec![record], shared);
    engine.connect(agent);

    let mut positions = ScriptedPositions::new();
    positions.place(agent, 0.0, 0.0, 0.0);
    let t0 = Instant::now();
    engine.poll(&positions, t0);
    assert!(!roles.lock().unwrap().has_role(agent, "outlaw"));

    positions.place(agent, 100.0, 0.0, 0.0);
    engine.poll(&positions, t0 + Duration::from_millis(300));
    assert!(roles.lock().unwrap().has_role(agent, "outlaw"));
}

#[test]
fn hot_swap_rebinds_handlers_to_the_new_backend() {
    let (old_backend, shared) = shared_roles();
    let mut engine = engine_with(vec![hospital()], shared);
    let medic = AgentId(1);
    engine.connect(medic);

    let mut positions = ScriptedPositions::new();
    positions.place(medic, 0.0, 0.0, 0.0);
    let t0 = Instant::now();
    engine.poll(&positions, t0);
    assert!(old_backend.lock().unwrap().has_role(medic, "medic"));

    // Swap the role backend without reloading zones. Rebuilt handlers
    // init against the new backend immediately.
    let (new_backend, shared) = shared_roles();
    register_builtin(engine.registry_mut(), shared);
    assert!(new_backend.lock().unwrap().role_exists("medic"));

    positions.place(medic, 100.0, 0.0, 0.0);
    engine.poll(&positions, t0 + Duration::from_millis(300));

    // The revoke went to the new backend; the old one keeps the stale
    // grant because nothing talks to it anymore.
    let log = new_backend.lock().unwrap().log().to_vec();
    assert!(log.contains(&"remove:1:medic".to_string()));
    assert!(old_backend.lock().unwrap().has_role(medic, "medic"));
}
