//! The effectful `role` tag.

use std::sync::Arc;

use cordon_core::{AgentId, TagDescriptor};
use cordon_tag::{BuildError, TagFactory, TagHandler};
use cordon_zone::Zone;
use tracing::warn;

use crate::names;
use crate::roles::{lock, RoleChange, SharedRoleService};

/// Grants a role while an agent is inside the zone.
///
/// The granted role is the tag's data payload. A zone-inverted tag
/// swaps the directions: entering revokes and leaving grants, so the
/// role marks agents currently outside the zone.
///
/// The optional group field filters who is affected. A plain group is
/// a whitelist (only holders of that role are affected); an inverted
/// group is a blacklist (holders are exempt).
pub struct RoleTag {
    role: String,
    group: Option<String>,
    zone_inverted: bool,
    group_inverted: bool,
    service: SharedRoleService,
}

impl RoleTag {
    fn is_affected(&self, agent: AgentId) -> bool {
        match &self.group {
            Some(group) => lock(&self.service).agent_has_role(agent, group) != self.group_inverted,
            None => true,
        }
    }

    fn ensure_role(&mut self) -> bool {
        let mut svc = lock(&self.service);
        svc.role_exists(&self.role) || svc.create_role(&self.role)
    }

    /// Apply a membership change, recreating the role once if the
    /// backend reports it missing. Backends that garbage-collect
    /// empty roles hit this on the first grant after a quiet period.
    fn apply(
        &mut self,
        agent: AgentId,
        zone: &Zone,
        change: fn(&mut dyn crate::roles::RoleService, AgentId, &str) -> RoleChange,
    ) {
        for attempt in 0..2 {
            let outcome = change(&mut *lock(&self.service), agent, &self.role);
            match outcome {
                RoleChange::Success | RoleChange::DuplicateEntry => return,
                RoleChange::RoleNotFound => {
                    if attempt == 1 || !self.ensure_role() {
                        break;
                    }
                }
            }
        }
        warn!(
            zone = %zone.name(),
            role = %self.role,
            %agent,
            "role change failed, role missing and could not be recreated"
        );
    }

    fn grant(&mut self, agent: AgentId, zone: &Zone) {
        self.apply(agent, zone, |svc, a, r| svc.add_agent_to_role(a, r));
    }

    fn revoke(&mut self, agent: AgentId, zone: &Zone) {
        self.apply(agent, zone, |svc, a, r| svc.remove_agent_from_role(a, r));
    }
}

impl TagHandler for RoleTag {
    fn name(&self) -> &str {
        names::ROLE
    }

    fn init(&mut self) -> bool {
        if self.ensure_role() {
            true
        } else {
            warn!(role = %self.role, "role backend refused to create role");
            false
        }
    }

    fn on_enter(&mut self, agent: AgentId, zone: &Zone) {
        if !self.is_affected(agent) {
            return;
        }
        if self.zone_inverted {
            self.revoke(agent, zone);
        } else {
            self.grant(agent, zone);
        }
    }

    fn on_exit(&mut self, agent: AgentId, zone: &Zone) {
        if !self.is_affected(agent) {
            return;
        }
        if self.zone_inverted {
            self.grant(agent, zone);
        } else {
            self.revoke(agent, zone);
        }
    }
}

/// Builds [`RoleTag`] handlers around a shared role service.
pub struct RoleTagFactory {
    service: SharedRoleService,
}

impl RoleTagFactory {
    /// Wrap a role service.
    pub fn new(service: SharedRoleService) -> Self {
        Self { service }
    }
}

impl TagFactory for RoleTagFactory {
    fn tag_name(&self) -> &str {
        names::ROLE
    }

    fn create(
        &self,
        _zone: &Arc<Zone>,
        tag: &TagDescriptor,
    ) -> Result<Box<dyn TagHandler>, BuildError> {
        let role = match tag.data.as_deref() {
            Some(data) if !data.is_empty() => data.to_string(),
            _ => {
                return Err(BuildError::new(
                    "role tag requires a role name as data payload",
                ))
            }
        };
        Ok(Box::new(RoleTag {
            role,
            group: tag.group.clone(),
            zone_inverted: tag.zone_inverted,
            group_inverted: tag.group_inverted,
            service: self.service.clone(),
        }))
    }
}
