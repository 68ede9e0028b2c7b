//! Capability checks consumed before listing queries.
//!
//! The permission engine itself lives outside this crate; [`Authorizer`] is
//! the boundary it plugs into.

use std::collections::{HashMap, HashSet};

use domain::{User, CAP_FIND_USER, ROLE_ADMINISTRATOR, ROLE_AUTHENTICATED};

/// Identity of the caller a request runs for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<u64>,
    pub roles: Vec<String>,
}

impl RequestContext {
    /// Caller with no identity and no roles
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Caller acting as `user`, with that user's roles
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: Some(user.id()),
            roles: user.roles().to_vec(),
        }
    }

    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: None,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Answers whether a caller holds a named capability.
pub trait Authorizer: Send + Sync {
    fn can(&self, ctx: &RequestContext, capability: &str) -> bool;
}

/// Grants everything. Used by operator tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can(&self, _ctx: &RequestContext, _capability: &str) -> bool {
        true
    }
}

/// Role to capability table.
///
/// The administrator role holds every capability.
#[derive(Debug, Clone, Default)]
pub struct RolePermissions {
    grants: HashMap<String, HashSet<String>>,
}

impl RolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticated users may search users
    pub fn with_defaults() -> Self {
        Self::new().grant(ROLE_AUTHENTICATED, CAP_FIND_USER)
    }

    pub fn grant(mut self, role: impl Into<String>, capability: impl Into<String>) -> Self {
        self.grants
            .entry(role.into())
            .or_default()
            .insert(capability.into());
        self
    }
}

impl Authorizer for RolePermissions {
    fn can(&self, ctx: &RequestContext, capability: &str) -> bool {
        ctx.roles.iter().any(|role| {
            role == ROLE_ADMINISTRATOR
                || self
                    .grants
                    .get(role)
                    .is_some_and(|caps| caps.contains(capability))
        })
    }
}
