//! The host-supplied position feed.

use cordon_core::{AgentId, Vec3};

/// Where the engine reads agent positions from.
///
/// # Contract
///
/// - Returning `None` means the agent's position is momentarily
///   unknown (mid-teleport, not yet spawned). The engine skips the
///   agent for that pass and keeps its membership intact; it does
///   not treat the agent as having left anything.
/// - Positions are world-space. Map-coordinate conversion happens at
///   zone load time, never here.
pub trait PositionSource {
    /// Current world position of `agent`, if known.
    fn position(&self, agent: AgentId) -> Option<Vec3>;
}

impl<F> PositionSource for F
where
    F: Fn(AgentId) -> Option<Vec3>,
{
    fn position(&self, agent: AgentId) -> Option<Vec3> {
        self(agent)
    }
}
