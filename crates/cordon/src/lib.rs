//! Cordon: a spatial zone framework for game hosts and simulations.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Cordon sub-crates. For most users, adding `cordon` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cordon::prelude::*;
//! use std::time::Instant;
//!
//! // Authored records can come from anywhere; here they live in a Vec.
//! struct Records(Vec<ZoneRecord>);
//! impl ZoneProvider for Records {
//!     fn load(&mut self) -> Result<Vec<ZoneRecord>, ProviderError> {
//!         Ok(self.0.clone())
//!     }
//!     fn save(&mut self, _: &[ZoneRecord]) -> Result<(), ProviderError> {
//!         Ok(())
//!     }
//! }
//!
//! // A circular no-build zone at the origin.
//! let depot = ZoneBuilder::new("Depot")
//!     .position(0.0, 0.0)
//!     .circle(25.0)
//!     .tag("#nobuilding")
//!     .finish()
//!     .unwrap();
//!
//! let mut engine = ZoneEngine::new(TrackerConfig::default()).unwrap();
//! let events = engine.take_events().unwrap();
//! engine.reload(&mut Records(vec![depot])).unwrap();
//!
//! // The host feeds positions; a closure works as a PositionSource.
//! let agent = AgentId(1);
//! engine.connect(agent);
//! engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), Instant::now());
//!
//! assert!(engine.is_inside_zone(agent, "depot"));
//! assert!(events.try_recv().unwrap().is_enter());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cordon-core` | IDs, geometry primitives, the tag mini-language |
//! | [`zone`] | `cordon-zone` | Shapes, zone records, providers, map transforms |
//! | [`tag`] | `cordon-tag` | Tag handler traits and the per-zone registry |
//! | [`tags`] | `cordon-tags` | Bundled handlers and the role service abstraction |
//! | [`tracker`] | `cordon-tracker` | The membership tracking engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the tag mini-language (`cordon-core`).
///
/// Contains [`types::AgentId`], the geometry primitives
/// [`types::Vec2`] and [`types::Vec3`], axis-aligned bounds, and
/// [`types::parse_tag`] with its [`types::TagDescriptor`] output.
pub use cordon_core as types;

/// Zone geometry, records, and providers (`cordon-zone`).
///
/// Build authored records with [`zone::ZoneBuilder`], store them
/// behind a [`zone::ZoneProvider`], and assemble runtime
/// [`zone::Zone`]s with [`zone::build_zone_set`]. Map-image
/// coordinates convert through [`zone::MapTransform`].
pub use cordon_zone as zone;

/// Tag handler traits and the per-zone registry (`cordon-tag`).
///
/// The [`tag::TagFactory`] trait is the main extension point for
/// user-defined zone behavior; the [`tag::TagRegistry`] owns every
/// live [`tag::TagHandler`].
pub use cordon_tag as tag;

/// Bundled tag handlers (`cordon-tags`).
///
/// Marker tags, the role-granting tag, and the
/// [`tags::RoleService`] backend abstraction. Wire everything up
/// with [`tags::register_builtin`].
pub use cordon_tags as tags;

/// The membership tracking engine (`cordon-tracker`).
///
/// [`tracker::ZoneEngine`] polls agent positions, maintains
/// membership, notifies tag handlers, and emits
/// [`tracker::ZoneEvent`]s on a bounded channel.
pub use cordon_tracker as tracker;

/// Common imports for typical Cordon usage.
///
/// ```rust
/// use cordon::prelude::*;
/// ```
///
/// This imports the most frequently used types: the engine and its
/// configuration, zone building and providing, tag registration, and
/// the geometry primitives.
pub mod prelude {
    // Core types
    pub use cordon_core::{AgentId, TagDescriptor, Vec2, Vec3};

    // Zones
    pub use cordon_zone::{
        build_zone_set, MapTransform, Zone, ZoneBuilder, ZoneProvider, ZoneRecord,
    };

    // Errors
    pub use cordon_tag::BuildError;
    pub use cordon_tracker::{ConfigError, ReloadError};
    pub use cordon_zone::{ProviderError, ZoneDefinitionError};

    // Tag handling
    pub use cordon_tag::{TagFactory, TagHandler, TagRegistry};
    pub use cordon_tags::{register_builtin, RoleChange, RoleService, SharedRoleService};

    // Tracking
    pub use cordon_tracker::{PositionSource, TrackerConfig, ZoneEngine, ZoneEvent};
}
