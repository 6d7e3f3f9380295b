//! Role-Permission Table
//!
//! Static mapping from each role to its set of granted permission tokens,
//! defined at process start and never mutated at runtime.

use super::identity::Role;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An opaque permission token gating a dashboard action or view
///
/// Tokens are plain strings such as `"view:dashboard"` or
/// `"manage:tenants"`. The role table defines the granted universe
/// implicitly; unknown tokens are legal query inputs that simply never
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Permission {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for Permission {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from roles to their granted permission sets
///
/// Lookup is total: a role without an entry yields the empty set, never an
/// error and never wildcard-allow.
#[derive(Debug, Clone)]
pub struct RolePermissions {
    grants: HashMap<Role, HashSet<Permission>>,
    /// Returned by reference for roles without an entry
    empty: HashSet<Permission>,
}

impl Default for RolePermissions {
    /// The built-in dashboard table
    fn default() -> Self {
        let mut table = Self::empty();
        for (role, tokens) in [
            (
                Role::Administrator,
                &[
                    "view:dashboard",
                    "manage:tenants",
                    "manage:units",
                    "manage:payments",
                    "manage:applications",
                    "view:reports",
                    "manage:settings",
                ][..],
            ),
            (
                Role::Agency,
                &[
                    "view:dashboard",
                    "manage:tenants",
                    "manage:units",
                    "manage:payments",
                    "manage:applications",
                    "view:reports",
                ][..],
            ),
            (
                Role::Agent,
                &["view:dashboard", "manage:tenants", "manage:applications"][..],
            ),
            (
                Role::Tenant,
                &["view:dashboard", "view:payments", "submit:maintenance"][..],
            ),
            (Role::Guest, &["view:listings"][..]),
        ] {
            for token in tokens {
                table = table.grant(role, *token);
            }
        }
        table
    }
}

impl RolePermissions {
    /// A table with no grants at all
    pub fn empty() -> Self {
        Self {
            grants: HashMap::new(),
            empty: HashSet::new(),
        }
    }

    /// Builder-style grant. Duplicate grants are harmless.
    pub fn grant(mut self, role: Role, permission: impl Into<Permission>) -> Self {
        self.grants
            .entry(role)
            .or_default()
            .insert(permission.into());
        self
    }

    /// Total lookup: roles without an entry get the empty set
    pub fn permissions_for(&self, role: Role) -> &HashSet<Permission> {
        self.grants.get(&role).unwrap_or(&self.empty)
    }

    /// Membership test for a single role and permission
    pub fn role_has(&self, role: Role, permission: &Permission) -> bool {
        self.permissions_for(role).contains(permission)
    }
}
