//! Session Storage - Persistence layer for the current identity
//!
//! One JSON blob under a fixed file name in the storage directory. Absence
//! of the file means no session; malformed content is treated as absent.

use crate::auth::Identity;
use estate_core::{ErrorContext, EstateError, EstateResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persists the authenticated identity under a fixed storage key
///
/// Exclusively owned by the session store; no other component writes the
/// identity blob.
pub struct SessionStorage {
    /// Base directory for identity storage
    storage_dir: PathBuf,
}

impl SessionStorage {
    /// File name of the persisted identity blob
    pub const IDENTITY_FILE: &'static str = "identity.json";

    /// Create a new storage manager, creating the directory if needed
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> EstateResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&storage_dir).map_err(|e| EstateError::Storage {
            message: format!(
                "failed to create storage directory {}",
                storage_dir.display()
            ),
            source: Some(Box::new(e)),
            context: ErrorContext::new("session_storage").with_operation("create_dir"),
        })?;

        info!("Session storage initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    fn identity_path(&self) -> PathBuf {
        self.storage_dir.join(Self::IDENTITY_FILE)
    }

    /// Store the serialized identity
    pub fn save(&self, identity: &Identity) -> EstateResult<()> {
        let path = self.identity_path();

        let json = serde_json::to_string_pretty(identity).map_err(EstateError::Serialization)?;

        std::fs::write(&path, json).map_err(|e| EstateError::Storage {
            message: format!("failed to write {}", path.display()),
            source: Some(Box::new(e)),
            context: ErrorContext::new("session_storage").with_operation("save"),
        })?;

        debug!("Persisted identity {} to {}", identity.email, path.display());
        Ok(())
    }

    /// Read the persisted identity, if any
    ///
    /// Absent, unreadable, and malformed blobs all yield `None`; corruption
    /// is swallowed here and never surfaced to callers.
    pub fn load(&self) -> Option<Identity> {
        let path = self.identity_path();

        if !path.exists() {
            return None;
        }

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!(
                    "Failed to read persisted identity from {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str::<Identity>(&json) {
            Ok(identity) => {
                debug!(
                    "Loaded persisted identity {} from {}",
                    identity.email,
                    path.display()
                );
                Some(identity)
            }
            Err(e) => {
                warn!(
                    "Discarding malformed identity blob at {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Remove the persisted identity
    ///
    /// Idempotent; removal failures are logged and swallowed so logout
    /// cannot fail.
    pub fn clear(&self) {
        let path = self.identity_path();

        if !path.exists() {
            return;
        }

        if let Err(e) = std::fs::remove_file(&path) {
            warn!(
                "Failed to remove persisted identity {}: {}",
                path.display(),
                e
            );
        } else {
            debug!("Cleared persisted identity at {}", path.display());
        }
    }

    /// Whether a persisted identity blob currently exists
    pub fn has_identity(&self) -> bool {
        self.identity_path().exists()
    }
}
