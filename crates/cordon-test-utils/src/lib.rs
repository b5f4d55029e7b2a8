//! Test utilities and mock types for Cordon development.
//!
//! Provides mock implementations of the framework's host-facing
//! traits ([`ZoneProvider`], [`RoleService`], [`PositionSource`]) and
//! a handful of fixture helpers for building zones in one line.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use cordon_core::{AgentId, Vec2, Vec3};
use cordon_tags::{RoleChange, RoleService, SharedRoleService};
use cordon_tracker::PositionSource;
use cordon_zone::{ProviderError, Zone, ZoneBuilder, ZoneProvider, ZoneRecord};

/// Mock implementation of [`ZoneProvider`] backed by an in-memory
/// record list.
///
/// Pre-populate with [`set_records`](StaticProvider::set_records),
/// make the next `load` fail with
/// [`fail_loads`](StaticProvider::fail_loads), and inspect what was
/// written back with [`saved`](StaticProvider::saved).
pub struct StaticProvider {
    records: Vec<ZoneRecord>,
    saved: Vec<Vec<ZoneRecord>>,
    fail_load: Option<String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            saved: Vec::new(),
            fail_load: None,
        }
    }

    /// A provider pre-loaded with the given records.
    pub fn with_records(records: Vec<ZoneRecord>) -> Self {
        Self {
            records,
            saved: Vec::new(),
            fail_load: None,
        }
    }

    /// Replace the records future `load` calls return, clearing any
    /// pending failure.
    pub fn set_records(&mut self, records: Vec<ZoneRecord>) {
        self.records = records;
        self.fail_load = None;
    }

    /// Make every `load` fail with the given reason until
    /// [`set_records`](StaticProvider::set_records) is called again.
    pub fn fail_loads(&mut self, reason: impl Into<String>) {
        self.fail_load = Some(reason.into());
    }

    /// Every record list passed to `save`, oldest first.
    pub fn saved(&self) -> &[Vec<ZoneRecord>] {
        &self.saved
    }
}

impl Default for StaticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneProvider for StaticProvider {
    fn load(&mut self) -> Result<Vec<ZoneRecord>, ProviderError> {
        match &self.fail_load {
            Some(reason) => Err(ProviderError::new(reason.clone())),
            None => Ok(self.records.clone()),
        }
    }

    fn save(&mut self, records: &[ZoneRecord]) -> Result<(), ProviderError> {
        self.saved.push(records.to_vec());
        Ok(())
    }
}

/// Mock implementation of [`RoleService`] that records every mutating
/// call.
///
/// Role membership lives in a `HashMap<String, HashSet<AgentId>>` and
/// the log holds one entry per mutating call in the form
/// `"create:role"`, `"add:7:role"`, `"remove:7:role"`. Wrap one in a
/// shared handle with [`shared_roles`].
pub struct RecordingRoles {
    roles: HashMap<String, HashSet<AgentId>>,
    log: Vec<String>,
    refuse_create: bool,
}

impl RecordingRoles {
    pub fn new() -> Self {
        Self {
            roles: HashMap::new(),
            log: Vec::new(),
            refuse_create: false,
        }
    }

    /// Pre-create a role without logging it.
    pub fn preload_role(&mut self, role: impl Into<String>) {
        self.roles.entry(role.into()).or_default();
    }

    /// Pre-assign a role membership without logging it.
    pub fn preload_member(&mut self, agent: AgentId, role: impl Into<String>) {
        self.roles.entry(role.into()).or_default().insert(agent);
    }

    /// Drop a role behind the framework's back, as a backend restart
    /// would.
    pub fn drop_role(&mut self, role: &str) {
        self.roles.remove(role);
    }

    /// Make `create_role` report failure.
    pub fn refuse_creates(&mut self) {
        self.refuse_create = true;
    }

    pub fn has_role(&self, agent: AgentId, role: &str) -> bool {
        self.roles.get(role).is_some_and(|m| m.contains(&agent))
    }

    /// Mutating calls observed so far, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }
}

impl Default for RecordingRoles {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleService for RecordingRoles {
    fn role_exists(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    fn create_role(&mut self, role: &str) -> bool {
        self.log.push(format!("create:{role}"));
        if self.refuse_create {
            return false;
        }
        self.roles.entry(role.to_string()).or_default();
        true
    }

    fn agent_has_role(&self, agent: AgentId, role: &str) -> bool {
        self.has_role(agent, role)
    }

    fn add_agent_to_role(&mut self, agent: AgentId, role: &str) -> RoleChange {
        self.log.push(format!("add:{agent}:{role}"));
        match self.roles.get_mut(role) {
            Some(members) => {
                if members.insert(agent) {
                    RoleChange::Success
                } else {
                    RoleChange::DuplicateEntry
                }
            }
            None => RoleChange::RoleNotFound,
        }
    }

    fn remove_agent_from_role(&mut self, agent: AgentId, role: &str) -> RoleChange {
        self.log.push(format!("remove:{agent}:{role}"));
        match self.roles.get_mut(role) {
            Some(members) => {
                if members.remove(&agent) {
                    RoleChange::Success
                } else {
                    RoleChange::DuplicateEntry
                }
            }
            None => RoleChange::RoleNotFound,
        }
    }
}

/// A fresh [`RecordingRoles`] plus the shared handle handlers take.
///
/// The concrete handle lets the test inspect and rig the backend
/// while the framework holds the trait-object handle.
pub fn shared_roles() -> (Arc<Mutex<RecordingRoles>>, SharedRoleService) {
    let concrete = Arc::new(Mutex::new(RecordingRoles::new()));
    let shared: SharedRoleService = concrete.clone();
    (concrete, shared)
}

/// Mock implementation of [`PositionSource`] backed by a
/// `HashMap<AgentId, Vec3>`.
///
/// Move agents between polls with [`place`](ScriptedPositions::place)
/// and take their position away with
/// [`remove`](ScriptedPositions::remove).
pub struct ScriptedPositions {
    positions: HashMap<AgentId, Vec3>,
}

impl ScriptedPositions {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Put the agent at a world position.
    pub fn place(&mut self, agent: AgentId, x: f32, y: f32, z: f32) {
        self.positions.insert(agent, Vec3::new(x, y, z));
    }

    /// Forget the agent's position, making it unknown to the engine.
    pub fn remove(&mut self, agent: AgentId) {
        self.positions.remove(&agent);
    }
}

impl Default for ScriptedPositions {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for ScriptedPositions {
    fn position(&self, agent: AgentId) -> Option<Vec3> {
        self.positions.get(&agent).copied()
    }
}

/// A circular zone record at the given center.
pub fn circle_record(name: &str, x: f32, z: f32, radius: f32) -> ZoneRecord {
    match ZoneBuilder::new(name).position(x, z).circle(radius).finish() {
        Ok(rec) => rec,
        Err(e) => panic!("fixture record {name:?} is invalid: {e}"),
    }
}

/// A rectangular zone record at the given center.
pub fn rect_record(name: &str, x: f32, z: f32, size_x: f32, size_z: f32) -> ZoneRecord {
    match ZoneBuilder::new(name)
        .position(x, z)
        .rect(size_x, size_z)
        .finish()
    {
        Ok(rec) => rec,
        Err(e) => panic!("fixture record {name:?} is invalid: {e}"),
    }
}

/// A polygonal zone record from `(x, z)` vertices.
pub fn polygon_record(name: &str, x: f32, z: f32, points: &[(f32, f32)]) -> ZoneRecord {
    let points = points.iter().map(|&(px, pz)| Vec2::new(px, pz)).collect();
    match ZoneBuilder::new(name)
        .position(x, z)
        .polygon(points)
        .finish()
    {
        Ok(rec) => rec,
        Err(e) => panic!("fixture record {name:?} is invalid: {e}"),
    }
}

/// Build a runtime zone from a record, without a map transform.
pub fn zone(record: &ZoneRecord) -> Arc<Zone> {
    match Zone::from_record(record, None) {
        Ok(z) => Arc::new(z),
        Err(e) => panic!("fixture zone {:?} is invalid: {e}", record.name),
    }
}
