//! Zone geometry, records, and providers for the Cordon zone framework.
//!
//! This crate defines the shapes zones can take, the serializable
//! records they are authored as, and the validated runtime [`Zone`]
//! the membership tracker operates on.
//!
//! # Coordinate spaces
//!
//! Zones are authored either in world coordinates or in map-image
//! coordinates. A [`MapTransform`] converts the latter into the former
//! at load time; the runtime [`Zone`] always holds world coordinates.
//!
//! # Module map
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | Definition-time validation errors |
//! | [`line`] | Line segments and border spacing |
//! | [`shape`] | Circle, rectangle, and polygon footprints |
//! | [`record`] | Serializable zone records |
//! | [`builder`] | Fluent record construction |
//! | [`transform`] | Map-image to world conversion |
//! | [`zone`] | Validated runtime zones |
//! | [`provider`] | Record sources and zone-set assembly |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod error;
pub mod line;
pub mod provider;
pub mod record;
pub mod shape;
pub mod transform;
pub mod zone;

#[cfg(test)]
mod compliance;

pub use builder::ZoneBuilder;
pub use error::ZoneDefinitionError;
pub use line::Line;
pub use provider::{build_zone_set, ProviderError, RejectedRecord, ZoneProvider, ZoneSetBuild};
pub use record::{ShapeRecord, ZoneRecord};
pub use shape::{Polygon, ZoneShape, CIRCLE_SPACING, EDGE_SPACING};
pub use transform::MapTransform;
pub use zone::Zone;
