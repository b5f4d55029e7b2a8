//! Core types for the Cordon zone framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the Cordon workspace:
//! agent identity, ground-plane geometry primitives, axis-aligned
//! bounds, and the tag mini-language descriptor with its parser.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod bounds;
mod id;
mod point;
mod tag;

pub use bounds::Aabb;
pub use id::AgentId;
pub use point::{Vec2, Vec3};
pub use tag::{parse_tag, TagDescriptor};
