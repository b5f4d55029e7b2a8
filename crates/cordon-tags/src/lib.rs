//! Bundled tag handlers and the role service abstraction.
//!
//! Two kinds of handlers ship with the framework. Marker tags carry
//! no behavior of their own; the host inspects a zone's tags and
//! enforces the restriction itself (no building, no voice chat, and
//! so on). The `role` tag is effectful: it grants a host role while
//! an agent is inside the zone and revokes it on the way out, with
//! the role backend abstracted behind [`RoleService`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod marker;
pub mod role_tag;
pub mod roles;

pub use marker::{register_builtin, MarkerFactory, MarkerTag};
pub use role_tag::{RoleTag, RoleTagFactory};
pub use roles::{RoleChange, RoleService, SharedRoleService};

/// Well-known tag names understood by the bundled handlers.
pub mod names {
    /// Agents cannot deal damage.
    pub const NO_DAMAGE_DEAL: &str = "nodamagedeal";
    /// Agents cannot take damage from other agents.
    pub const NO_PVP_DAMAGE_TAKE: &str = "nopvpdamagetake";
    /// Agents cannot take damage at all.
    pub const NO_DAMAGE_TAKE: &str = "nodamagetake";
    /// Agents cannot place structures.
    pub const NO_BUILDING: &str = "nobuilding";
    /// Agents cannot salvage structures.
    pub const NO_SALVAGE: &str = "nosalvage";
    /// Proximity voice chat is disabled.
    pub const NO_VOICE_CHAT: &str = "novc";
    /// Voice chat reaches the whole server.
    pub const GLOBAL_VOICE_CHAT: &str = "globalvc";
    /// Grants a host role while inside; the role name is the tag's
    /// data payload.
    pub const ROLE: &str = "role";

    /// Every bundled marker tag, excluding the effectful `role` tag.
    pub const MARKERS: &[&str] = &[
        NO_DAMAGE_DEAL,
        NO_PVP_DAMAGE_TAKE,
        NO_DAMAGE_TAKE,
        NO_BUILDING,
        NO_SALVAGE,
        NO_VOICE_CHAT,
        GLOBAL_VOICE_CHAT,
    ];
}
