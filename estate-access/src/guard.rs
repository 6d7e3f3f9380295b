//! Access Guard
//!
//! Thin composition layer over the session store for protecting views:
//! resolves to a loading placeholder, a login redirect, an access-denied
//! placeholder, or the wrapped view.

use crate::auth::Permission;
use crate::session::{SessionState, SessionStore};

/// Required-permission specification for a protected view
#[derive(Debug, Clone, Default)]
pub enum PermissionRequirement {
    /// Authentication only, no specific permission
    #[default]
    None,
    /// A single required permission
    Single(Permission),
    /// Any one of the listed permissions
    AnyOf(Vec<Permission>),
}

impl PermissionRequirement {
    pub fn single(permission: impl Into<Permission>) -> Self {
        Self::Single(permission.into())
    }

    pub fn any_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::AnyOf(permissions.into_iter().map(Into::into).collect())
    }
}

/// Outcome of guarding a view
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome<V> {
    /// Session not yet resolved; show a loading placeholder, do not redirect
    Loading,
    /// No session; send the user to the login entry point
    RedirectToLogin,
    /// Authenticated but missing the required permission
    AccessDenied,
    /// Requirement satisfied; render the wrapped view
    Render(V),
}

/// Protected-view wrapper
pub struct AccessGuard {
    requirement: PermissionRequirement,
}

impl AccessGuard {
    pub fn new(requirement: PermissionRequirement) -> Self {
        Self { requirement }
    }

    /// Guard that only requires an authenticated session
    pub fn authenticated() -> Self {
        Self::new(PermissionRequirement::None)
    }

    /// Resolve the guard against the store, yielding the view on success
    pub async fn resolve<V>(&self, store: &SessionStore, view: V) -> GuardOutcome<V> {
        match store.state().await {
            SessionState::Unresolved => GuardOutcome::Loading,
            SessionState::Anonymous => GuardOutcome::RedirectToLogin,
            SessionState::Authenticated(_) => {
                let allowed = match &self.requirement {
                    PermissionRequirement::None => true,
                    PermissionRequirement::Single(permission) => {
                        store.has_permission(permission).await
                    }
                    PermissionRequirement::AnyOf(permissions) => {
                        store.has_any_permission(permissions).await
                    }
                };

                if allowed {
                    GuardOutcome::Render(view)
                } else {
                    GuardOutcome::AccessDenied
                }
            }
        }
    }

    /// Decision without a wrapped view
    pub async fn decide(&self, store: &SessionStore) -> GuardOutcome<()> {
        self.resolve(store, ()).await
    }
}
