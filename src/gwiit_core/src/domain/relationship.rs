use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{OrganizationId, SiteId};

/// What happens to users when the organization or site they reference is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    /// Refuse the removal while any user references the parent.
    Restrict,
    /// Clear the reference on every user.
    #[default]
    SetNull,
    /// Deactivate every referencing user. Users are never hard-deleted.
    Cascade,
}

/// A parent record users may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Organization(OrganizationId),
    Site(SiteId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Organization(id) => write!(f, "organization {id}"),
            Reference::Site(id) => write!(f, "site {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipPolicies {
    #[serde(default)]
    pub organization: OnDelete,
    #[serde(default)]
    pub site: OnDelete,
}

impl RelationshipPolicies {
    pub fn policy_for(&self, reference: Reference) -> OnDelete {
        match reference {
            Reference::Organization(_) => self.organization,
            Reference::Site(_) => self.site,
        }
    }
}
