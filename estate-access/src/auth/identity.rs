//! User Identity Management
//!
//! Defines roles, the authenticated user record, and the known-identity
//! directory that substitutes for a real user store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed category of user determining its permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Administrator,
    /// Letting agent managing tenants and applications
    Agent,
    /// Tenant with self-service access
    Tenant,
    /// Unauthenticated visitor browsing listings
    Guest,
    /// Agency account spanning multiple agents
    Agency,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrator"),
            Role::Agent => write!(f, "agent"),
            Role::Tenant => write!(f, "tenant"),
            Role::Guest => write!(f, "guest"),
            Role::Agency => write!(f, "agency"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "administrator" => Ok(Role::Administrator),
            "agent" => Ok(Role::Agent),
            "tenant" => Ok(Role::Tenant),
            "guest" => Ok(Role::Guest),
            "agency" => Ok(Role::Agency),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An authenticated user's record
///
/// Exclusively owned by the session store while a session is active and
/// discarded entirely on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier
    pub id: String,
    /// Email, unique within the known-identity set
    pub email: String,
    /// Display name
    pub name: String,
    /// Role, immutable once assigned
    pub role: Role,
    /// Avatar URL (optional)
    pub avatar: Option<String>,
    /// Phone number (optional)
    pub phone: Option<String>,
    /// Whether the email has been verified
    pub verified: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Synthesize a fresh identity with a new unique id
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            name: name.into(),
            role,
            avatar: None,
            phone: None,
            verified: false,
            created_at: Utc::now(),
        }
    }

    /// Set the avatar URL
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar = Some(url.into());
        self
    }

    /// Set the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Mark the identity as verified
    pub fn mark_verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Get user display string
    pub fn display_string(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

/// Directory of known identities, substituting for a real user store
///
/// Email comparison is exact and case-sensitive throughout.
pub trait IdentityDirectory: Send + Sync {
    /// Look up an identity by exact email match
    fn find_by_email(&self, email: &str) -> Option<Identity>;

    /// Whether an identity with this exact email exists
    fn contains_email(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    /// All known identities
    fn all(&self) -> Vec<Identity>;
}

/// Simple in-memory identity directory for testing and mock deployments
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    identities: Vec<Identity>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self {
            identities: Vec::new(),
        }
    }

    /// The mock identity set that ships with the dashboard
    pub fn seeded() -> Self {
        Self::new()
            .with_identity(
                Identity::new("admin@estate.com", "Amelia Stone", Role::Administrator)
                    .mark_verified(),
            )
            .with_identity(
                Identity::new("agency@estate.com", "Harbor & Finch Lettings", Role::Agency)
                    .mark_verified(),
            )
            .with_identity(
                Identity::new("agent@estate.com", "Marcus Reid", Role::Agent)
                    .with_phone("+44 7700 900123")
                    .mark_verified(),
            )
            .with_identity(Identity::new("tenant@estate.com", "Priya Shah", Role::Tenant))
    }

    /// Builder-style insert
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    pub fn add(&mut self, identity: Identity) {
        self.identities.push(identity);
    }
}

impl IdentityDirectory for StaticDirectory {
    fn find_by_email(&self, email: &str) -> Option<Identity> {
        self.identities.iter().find(|i| i.email == email).cloned()
    }

    fn all(&self) -> Vec<Identity> {
        self.identities.clone()
    }
}
