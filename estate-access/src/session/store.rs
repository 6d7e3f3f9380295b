//! Session Store - owns the single current identity
//!
//! Holds at most one authenticated identity at a time, persists it on every
//! transition, and answers permission queries derived from the
//! role-permission table. Constructed once per process and passed by
//! reference to consumers; never a hidden global.

use super::storage::SessionStorage;
use crate::auth::{Identity, IdentityDirectory, Permission, Role, RolePermissions};
use crate::{AccessConfig, AccessError, AccessResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Runtime presence or absence of a current identity
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Initial state, before the first storage read
    Unresolved,
    /// No identity present
    Anonymous,
    /// An identity is logged in
    Authenticated(Identity),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// The current identity, if authenticated
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// The session store
///
/// Login, signup, and logout are the only suspend points; they simulate
/// authentication latency and are serialized against each other so the
/// store has a single logical writer. Overlapping mutating calls queue
/// rather than error.
pub struct SessionStore {
    /// Current session state
    state: RwLock<SessionState>,
    /// Count of mutating operations in flight
    loading: AtomicUsize,
    /// Serializes login/signup/logout
    write_lock: Mutex<()>,
    /// Durable identity persistence
    storage: SessionStorage,
    /// Known-identities collaborator
    directory: Arc<dyn IdentityDirectory>,
    /// Role-permission table
    permissions: RolePermissions,
    /// Simulated latency for mutating operations
    auth_latency: Duration,
}

impl SessionStore {
    /// Create a new session store
    ///
    /// The store starts `Unresolved`; call [`initialize`](Self::initialize)
    /// once at process start to resolve it from persisted storage.
    pub fn new(config: AccessConfig, directory: Arc<dyn IdentityDirectory>) -> AccessResult<Self> {
        let storage = SessionStorage::new(&config.storage.base_dir)?;

        Ok(Self {
            state: RwLock::new(SessionState::Unresolved),
            loading: AtomicUsize::new(0),
            write_lock: Mutex::new(()),
            storage,
            directory,
            permissions: config.permissions,
            auth_latency: config.auth_latency,
        })
    }

    /// Resolve the initial state from persisted storage
    ///
    /// Absent, unreadable, or malformed storage resolves to `Anonymous`;
    /// this never fails. Calling it again after the store has resolved is a
    /// no-op, so a restored session cannot be clobbered by a second init.
    pub async fn initialize(&self) {
        let _writer = self.write_lock.lock().await;
        let mut state = self.state.write().await;

        if *state != SessionState::Unresolved {
            return;
        }

        *state = match self.storage.load() {
            Some(identity) => {
                debug!(email = %identity.email, "restored persisted session");
                SessionState::Authenticated(identity)
            }
            None => SessionState::Anonymous,
        };
    }

    /// Authenticate against the known-identity directory
    ///
    /// The password is accepted but not verified; credential verification
    /// is a separate collaborator that attaches at this boundary. On
    /// failure the session state is left untouched. Logging in while
    /// already authenticated simply replaces the identity.
    pub async fn login(&self, email: &str, _password: &str) -> AccessResult<Identity> {
        self.loading.fetch_add(1, Ordering::SeqCst);
        let _writer = self.write_lock.lock().await;

        let result = self.perform_login(email).await;

        self.loading.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn perform_login(&self, email: &str) -> AccessResult<Identity> {
        tokio::time::sleep(self.auth_latency).await;

        let identity = match self.directory.find_by_email(email) {
            Some(identity) => identity,
            None => {
                warn!(email, "login rejected: no matching identity");
                return Err(AccessError::InvalidCredentials);
            }
        };

        {
            let mut state = self.state.write().await;
            *state = SessionState::Authenticated(identity.clone());
        }
        self.storage.save(&identity)?;

        info!(email = %identity.email, role = %identity.role, "login succeeded");
        Ok(identity)
    }

    /// Register a new identity and authenticate as it
    ///
    /// Fails when the email collides with a known identity (exact,
    /// case-sensitive match). The password is accepted but not stored or
    /// verified.
    pub async fn signup(
        &self,
        email: &str,
        _password: &str,
        name: &str,
        role: Role,
    ) -> AccessResult<Identity> {
        self.loading.fetch_add(1, Ordering::SeqCst);
        let _writer = self.write_lock.lock().await;

        let result = self.perform_signup(email, name, role).await;

        self.loading.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn perform_signup(&self, email: &str, name: &str, role: Role) -> AccessResult<Identity> {
        tokio::time::sleep(self.auth_latency).await;

        if self.directory.contains_email(email) {
            warn!(email, "signup rejected: email already registered");
            return Err(AccessError::user_already_exists(email));
        }

        let identity = Identity::new(email, name, role);

        {
            let mut state = self.state.write().await;
            *state = SessionState::Authenticated(identity.clone());
        }
        self.storage.save(&identity)?;

        info!(email = %identity.email, role = %identity.role, "signup succeeded");
        Ok(identity)
    }

    /// End the current session
    ///
    /// Always succeeds, with no precondition on the current state; the
    /// store transitions to `Anonymous` and the persisted identity is
    /// cleared.
    pub async fn logout(&self) {
        self.loading.fetch_add(1, Ordering::SeqCst);
        let _writer = self.write_lock.lock().await;

        tokio::time::sleep(self.auth_latency).await;

        {
            let mut state = self.state.write().await;
            *state = SessionState::Anonymous;
        }
        self.storage.clear();

        info!("logged out");
        self.loading.fetch_sub(1, Ordering::SeqCst);
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// The current identity, if authenticated
    pub async fn current_identity(&self) -> Option<Identity> {
        self.state.read().await.identity().cloned()
    }

    /// Whether a mutating operation is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    /// The role-permission table this store answers queries from
    pub fn role_permissions(&self) -> &RolePermissions {
        &self.permissions
    }

    /// Whether the current identity holds `permission`
    ///
    /// Always `false` while anonymous or unresolved.
    pub async fn has_permission(&self, permission: &Permission) -> bool {
        let state = self.state.read().await;
        match state.identity() {
            Some(identity) => self.permissions.role_has(identity.role, permission),
            None => false,
        }
    }

    /// Whether the current identity holds at least one of `requested`
    ///
    /// Always `false` while anonymous or unresolved, and for an empty
    /// request set.
    pub async fn has_any_permission(&self, requested: &[Permission]) -> bool {
        let state = self.state.read().await;
        match state.identity() {
            Some(identity) => {
                let granted = self.permissions.permissions_for(identity.role);
                requested.iter().any(|p| granted.contains(p))
            }
            None => false,
        }
    }

    /// Whether the current identity holds every permission in `requested`
    ///
    /// Always `false` while anonymous or unresolved. An empty request set
    /// is vacuously satisfied by any authenticated identity.
    pub async fn has_all_permissions(&self, requested: &[Permission]) -> bool {
        let state = self.state.read().await;
        match state.identity() {
            Some(identity) => {
                let granted = self.permissions.permissions_for(identity.role);
                requested.iter().all(|p| granted.contains(p))
            }
            None => false,
        }
    }

    /// The full permission set of the current identity's role
    ///
    /// Empty while anonymous or unresolved.
    pub async fn current_permissions(&self) -> HashSet<Permission> {
        let state = self.state.read().await;
        match state.identity() {
            Some(identity) => self.permissions.permissions_for(identity.role).clone(),
            None => HashSet::new(),
        }
    }
}
