//! Strongly-typed agent identity.

use std::fmt;

/// Identifies a tracked agent (e.g. a connected player).
///
/// Agents are assigned IDs by the host; the tracker treats them as
/// opaque keys. `AgentId(n)` carries no ordering semantics beyond
/// map lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
