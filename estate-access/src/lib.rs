//! Estate Access - role-based access control and session lifecycle
//!
//! This crate is the access-control core of the Estate property-management
//! dashboard. It provides:
//!
//! - A static role-permission table mapping each [`Role`] to its granted
//!   permission tokens
//! - A [`SessionStore`] owning the single current identity, persisted to
//!   durable local storage and rehydrated on startup
//! - An [`AccessGuard`] that resolves protected views against the store
//!
//! ## Architecture
//!
//! This crate follows a clear separation between:
//! - **Foundation** (estate-core): errors and logging
//! - **Access control** (this crate): identities, permissions, sessions
//! - **Presentation** (dashboard views): consumes the query surface, out of
//!   scope here

pub mod auth;
pub mod guard;
pub mod session;

pub use auth::{Identity, IdentityDirectory, Permission, Role, RolePermissions, StaticDirectory};
pub use guard::{AccessGuard, GuardOutcome, PermissionRequirement};
pub use session::{SessionState, SessionStorage, SessionStore};

use std::path::PathBuf;
use std::time::Duration;

/// Access-control error type
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// No known identity matches the supplied email.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup collided with an already-registered email.
    #[error("User already exists: {email}")]
    UserAlreadyExists { email: String },

    #[error("Core error: {0}")]
    Core(#[from] estate_core::EstateError),
}

pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Create a signup-collision error
    pub fn user_already_exists<S: Into<String>>(email: S) -> Self {
        Self::UserAlreadyExists {
            email: email.into(),
        }
    }
}

/// Access-control configuration
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Role-permission table
    pub permissions: RolePermissions,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Simulated latency for login, signup, and logout
    pub auth_latency: Duration,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            permissions: RolePermissions::default(),
            storage: StorageConfig::default(),
            auth_latency: Duration::from_millis(750),
        }
    }
}

impl AccessConfig {
    /// Replace the role-permission table
    pub fn with_permissions(mut self, permissions: RolePermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Set the storage base directory
    pub fn with_storage_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.storage.base_dir = dir.into();
        self
    }

    /// Set the simulated authentication latency
    pub fn with_auth_latency(mut self, latency: Duration) -> Self {
        self.auth_latency = latency;
        self
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base directory for the persisted identity blob
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("estate");

        Self { base_dir }
    }
}

impl StorageConfig {
    /// Local storage rooted in the working directory
    pub fn local() -> Self {
        Self {
            base_dir: PathBuf::from(".estate"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::{
        AccessConfig, AccessError, AccessGuard, AccessResult, GuardOutcome, Identity, Permission,
        PermissionRequirement, Role, RolePermissions, SessionState, SessionStore, StaticDirectory,
    };
}
