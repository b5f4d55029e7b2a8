//! Marker tags and bundled-handler registration.

use std::sync::Arc;

use cordon_core::TagDescriptor;
use cordon_tag::{BuildError, TagFactory, TagHandler, TagRegistry};
use cordon_zone::Zone;

use crate::names;
use crate::role_tag::RoleTagFactory;
use crate::roles::SharedRoleService;

/// A tag with no behavior of its own.
///
/// Marker tags exist so zones can declare restrictions the host
/// enforces by inspecting [`Zone::tags`]. Installing a handler for
/// them keeps the registry's accounting uniform: a marker tag on an
/// installed zone counts as live, and a typo in a tag name still
/// produces the usual missing-factory warning.
pub struct MarkerTag {
    name: &'static str,
}

impl TagHandler for MarkerTag {
    fn name(&self) -> &str {
        self.name
    }

    fn init(&mut self) -> bool {
        true
    }
}

/// Builds [`MarkerTag`] handlers for one marker name.
pub struct MarkerFactory {
    name: &'static str,
}

impl MarkerFactory {
    /// A factory for the given marker tag name.
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl TagFactory for MarkerFactory {
    fn tag_name(&self) -> &str {
        self.name
    }

    fn create(
        &self,
        _zone: &Arc<Zone>,
        _tag: &TagDescriptor,
    ) -> Result<Box<dyn TagHandler>, BuildError> {
        Ok(Box::new(MarkerTag { name: self.name }))
    }
}

/// Register every bundled factory: all marker tags plus the `role`
/// tag backed by `roles`.
pub fn register_builtin(registry: &mut TagRegistry, roles: SharedRoleService) {
    for name in names::MARKERS {
        registry.register_factory(Box::new(MarkerFactory::new(name)));
    }
    registry.register_factory(Box::new(RoleTagFactory::new(roles)));
}
