//! # Supply-Chain Roles and Membership
//!
//! Earlier revisions of this contract hard-coded specific org identities as
//! the only legal counterpart at each handoff, which conflates identity with
//! role: onboarding a second logistics operator meant a code change. Here
//! eligibility is a membership lookup — the [`RoleDirectory`] maps each
//! [`Role`] to the set of orgs that hold it, and the state machine asks
//! "does this org hold the logistics role", never "is this org X".
//!
//! Membership is data. The default directory seeds the original
//! deployment's orgs so the known topology works unchanged, and production
//! deployments construct their own.

use std::collections::{BTreeMap, BTreeSet};

use phl_core::OrgId;

/// A supply-chain role an organization can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Creates assets (the laboratory).
    Manufacturer,
    /// Warehouses assets between lab and health provider.
    Logistics,
    /// Receives and dispenses assets to patients.
    Health,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Manufacturer => "manufacturer",
            Self::Logistics => "logistics",
            Self::Health => "health",
        };
        f.write_str(s)
    }
}

/// Which organizations hold which supply-chain roles.
///
/// An org may hold several roles (a vertically integrated operator), and a
/// role may be held by several orgs.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    members: BTreeMap<Role, BTreeSet<OrgId>>,
}

impl RoleDirectory {
    /// An empty directory: no org holds any role.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The original deployment topology: `Org1MSP` manufactures,
    /// `OrgLogisticaMSP` warehouses, `Org2MSP` dispenses.
    pub fn well_known() -> Self {
        let mut dir = Self::empty();
        dir.grant(Role::Manufacturer, OrgId::new("Org1MSP"));
        dir.grant(Role::Logistics, OrgId::new("OrgLogisticaMSP"));
        dir.grant(Role::Health, OrgId::new("Org2MSP"));
        dir
    }

    /// Grant a role to an organization.
    pub fn grant(&mut self, role: Role, org: OrgId) {
        self.members.entry(role).or_default().insert(org);
    }

    /// Revoke a role from an organization.
    pub fn revoke(&mut self, role: Role, org: &OrgId) {
        if let Some(orgs) = self.members.get_mut(&role) {
            orgs.remove(org);
        }
    }

    /// Whether an organization holds a role.
    pub fn is_member(&self, role: Role, org: &OrgId) -> bool {
        self.members
            .get(&role)
            .is_some_and(|orgs| orgs.contains(org))
    }
}
