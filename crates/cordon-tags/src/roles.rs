//! The role service abstraction.

use std::sync::{Arc, Mutex, MutexGuard};

use cordon_core::AgentId;

/// Outcome of a role membership change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleChange {
    /// The membership changed as requested.
    Success,
    /// The requested state was already in effect; adding a member
    /// twice or removing an absent one lands here and is harmless.
    DuplicateEntry,
    /// The role itself does not exist on the backend.
    RoleNotFound,
}

/// Host-side role storage.
///
/// # Contract
///
/// - Role names are opaque to the framework and compared however the
///   backend compares them.
/// - `create_role` returns whether the role exists after the call,
///   so creating an existing role succeeds.
/// - Membership changes report [`RoleChange::DuplicateEntry`] rather
///   than failing when the requested state already holds.
pub trait RoleService: Send {
    /// Whether the role exists on the backend.
    fn role_exists(&self, role: &str) -> bool;

    /// Create the role if missing. Returns whether it exists after
    /// the call.
    fn create_role(&mut self, role: &str) -> bool;

    /// Whether the agent currently holds the role.
    fn agent_has_role(&self, agent: AgentId, role: &str) -> bool;

    /// Add the agent to the role.
    fn add_agent_to_role(&mut self, agent: AgentId, role: &str) -> RoleChange;

    /// Remove the agent from the role.
    fn remove_agent_from_role(&mut self, agent: AgentId, role: &str) -> RoleChange;
}

/// A role service shared between handlers.
///
/// Handlers live inside the registry and run on the tracker's thread,
/// but the backend is typically shared with the host's own systems,
/// hence the mutex.
pub type SharedRoleService = Arc<Mutex<dyn RoleService>>;

/// Lock a shared role service, recovering the data from a poisoned
/// mutex rather than propagating the panic.
pub(crate) fn lock(service: &SharedRoleService) -> MutexGuard<'_, dyn RoleService + 'static> {
    service.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
