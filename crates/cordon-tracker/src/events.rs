//! Host-facing transition events.

use std::sync::Arc;

use cordon_core::AgentId;
use cordon_zone::Zone;

/// An agent crossed a zone boundary.
///
/// Events carry the zone by `Arc`, so an event drained after a
/// reload still refers to the zone as it was when the transition
/// happened.
#[derive(Clone, Debug)]
pub enum ZoneEvent {
    /// The agent is now inside the zone.
    Enter {
        /// The crossing agent.
        agent: AgentId,
        /// The zone entered.
        zone: Arc<Zone>,
    },
    /// The agent is no longer inside the zone.
    Exit {
        /// The crossing agent.
        agent: AgentId,
        /// The zone left.
        zone: Arc<Zone>,
    },
}

impl ZoneEvent {
    /// The agent the event concerns.
    pub fn agent(&self) -> AgentId {
        match self {
            Self::Enter { agent, .. } | Self::Exit { agent, .. } => *agent,
        }
    }

    /// The zone the event concerns.
    pub fn zone(&self) -> &Arc<Zone> {
        match self {
            Self::Enter { zone, .. } | Self::Exit { zone, .. } => zone,
        }
    }

    /// Whether this is an enter event.
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter { .. })
    }
}
