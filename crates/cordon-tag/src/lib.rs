//! Tag handler traits and the per-zone handler registry.
//!
//! Tags attach behavior to zones. Each parsed
//! [`TagDescriptor`](cordon_core::TagDescriptor) on a zone is matched
//! against a registered [`TagFactory`] by name, and the factory
//! builds one [`TagHandler`] instance per zone. The [`TagRegistry`]
//! owns every live handler and routes enter and exit notifications
//! to them.
//!
//! Handlers are fallible at two points: construction and `init`.
//! Both failures degrade the single tag on the single zone, never
//! the zone itself.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod registry;

pub use handler::{BuildError, TagFactory, TagHandler};
pub use registry::TagRegistry;
