//! Handler and factory traits.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use cordon_core::{AgentId, TagDescriptor};
use cordon_zone::Zone;

/// Behavior attached to one tag on one zone.
///
/// # Contract
///
/// - One handler instance serves exactly one zone. Factories build a
///   fresh instance per zone, so handlers may keep per-zone state
///   without synchronization.
/// - [`TagHandler::init`] runs once, after construction and before
///   any notification. Returning `false` discards the handler; the
///   zone's other tags are unaffected.
/// - Enter and exit notifications for one agent alternate. The
///   registry never delivers two enters or two exits in a row for
///   the same agent and zone.
/// - Dropping the handler is its teardown. Handlers needing cleanup
///   implement [`Drop`].
pub trait TagHandler: Send {
    /// The tag name this handler serves, lowercase.
    fn name(&self) -> &str;

    /// One-time setup. Returning `false` discards the handler.
    fn init(&mut self) -> bool;

    /// An agent entered the handler's zone.
    fn on_enter(&mut self, agent: AgentId, zone: &Zone) {
        let _ = (agent, zone);
    }

    /// An agent left the handler's zone.
    fn on_exit(&mut self, agent: AgentId, zone: &Zone) {
        let _ = (agent, zone);
    }
}

/// Builds [`TagHandler`] instances for one tag name.
///
/// # Contract
///
/// - [`TagFactory::tag_name`] is matched against parsed tag names
///   ignoring ASCII case.
/// - [`TagFactory::create`] receives the zone and the full parsed
///   descriptor, including group and data fields, and may reject the
///   combination with [`BuildError`].
pub trait TagFactory: Send {
    /// The tag name this factory serves.
    fn tag_name(&self) -> &str;

    /// Build a handler for `tag` on `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the descriptor is unusable for
    /// this tag, for example a missing required data field.
    fn create(
        &self,
        zone: &Arc<Zone>,
        tag: &TagDescriptor,
    ) -> Result<Box<dyn TagHandler>, BuildError>;
}

/// A factory could not build a handler from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    /// Human-readable rejection reason.
    pub reason: String,
}

impl BuildError {
    /// Build an error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag handler construction failed: {}", self.reason)
    }
}

impl Error for BuildError {}
