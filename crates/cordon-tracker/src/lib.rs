//! Membership tracking engine.
//!
//! The engine polls agent positions against a swap-on-reload zone
//! set, maintains per-agent membership, and fans transitions out to
//! two consumers: tag handlers in the
//! [`TagRegistry`](cordon_tag::TagRegistry), synchronously, and the
//! host, through a bounded event channel.
//!
//! # Ordering guarantees
//!
//! - For one agent in one poll pass, every exit fires before any
//!   enter. An agent teleporting between zones is never observed in
//!   both.
//! - Exits on disconnect fire in the order the zones were entered.
//! - Enter and exit events for one agent and zone strictly alternate.
//!
//! # Module map
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | Engine configuration and validation |
//! | [`source`] | The host-supplied position feed |
//! | [`set`] | Immutable, swap-on-reload zone sets |
//! | [`events`] | Host-facing transition events |
//! | [`metrics`] | Poll-pass counters |
//! | [`error`] | Reload failures |
//! | [`engine`] | The engine itself |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod metrics;
pub mod set;
pub mod source;

pub use config::{ConfigError, TrackerConfig};
pub use engine::{ReloadReport, ZoneEngine};
pub use error::ReloadError;
pub use events::ZoneEvent;
pub use metrics::PollMetrics;
pub use set::ZoneSet;
pub use source::PositionSource;
