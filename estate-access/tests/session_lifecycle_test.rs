//! Integration tests for the session store lifecycle
//!
//! Exercises login, signup, logout, rehydration from persisted storage, and
//! the permission query surface end to end.

use estate_access::{
    AccessConfig, AccessError, Permission, Role, RolePermissions, SessionState, SessionStorage,
    SessionStore, StaticDirectory,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Create a zero-latency config rooted in a temporary directory
fn test_config(dir: &TempDir) -> AccessConfig {
    AccessConfig::default()
        .with_storage_dir(dir.path())
        .with_auth_latency(Duration::ZERO)
}

/// Create a store over the seeded mock directory
fn seeded_store(dir: &TempDir) -> SessionStore {
    SessionStore::new(test_config(dir), Arc::new(StaticDirectory::seeded()))
        .expect("store should construct")
}

fn identity_blob_exists(dir: &TempDir) -> bool {
    dir.path().join(SessionStorage::IDENTITY_FILE).exists()
}

#[tokio::test]
async fn test_fresh_store_resolves_to_anonymous() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    assert_eq!(store.state().await, SessionState::Unresolved);

    store.initialize().await;
    assert_eq!(store.state().await, SessionState::Anonymous);
    assert!(!identity_blob_exists(&dir));
}

#[tokio::test]
async fn test_login_grants_exactly_the_role_permissions() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    let identity = store.login("admin@estate.com", "pw").await.unwrap();
    assert_eq!(identity.role, Role::Administrator);

    let expected = RolePermissions::default()
        .permissions_for(Role::Administrator)
        .clone();
    assert_eq!(store.current_permissions().await, expected);
}

#[tokio::test]
async fn test_login_with_unknown_email_is_rejected_without_transition() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    let result = store.login("nonexistent@x.com", "any").await;
    assert!(matches!(result, Err(AccessError::InvalidCredentials)));

    assert_eq!(store.state().await, SessionState::Anonymous);
    assert!(!identity_blob_exists(&dir));
}

#[tokio::test]
async fn test_failed_login_leaves_existing_session_intact() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    let admin = store.login("admin@estate.com", "pw").await.unwrap();
    let result = store.login("nonexistent@x.com", "any").await;
    assert!(result.is_err());

    assert_eq!(store.current_identity().await, Some(admin));
}

#[tokio::test]
async fn test_signup_collision_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    let result = store
        .signup("admin@estate.com", "pw", "X", Role::Tenant)
        .await;

    match result {
        Err(AccessError::UserAlreadyExists { email }) => {
            assert_eq!(email, "admin@estate.com");
        }
        other => panic!("expected UserAlreadyExists, got {:?}", other),
    }

    assert_eq!(store.state().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_signup_synthesizes_a_fresh_identity() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    let identity = store
        .signup("newagent@estate.com", "pw", "Rosa Vane", Role::Agent)
        .await
        .unwrap();

    assert_eq!(identity.email, "newagent@estate.com");
    assert_eq!(identity.name, "Rosa Vane");
    assert_eq!(identity.role, Role::Agent);
    assert!(!identity.verified);
    assert!(!identity.id.is_empty());

    assert_eq!(store.current_identity().await, Some(identity));
    assert!(identity_blob_exists(&dir));
}

#[tokio::test]
async fn test_logout_clears_state_and_storage() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    store.login("tenant@estate.com", "pw").await.unwrap();
    assert!(identity_blob_exists(&dir));

    store.logout().await;

    assert_eq!(store.state().await, SessionState::Anonymous);
    assert!(store.current_permissions().await.is_empty());
    assert!(!identity_blob_exists(&dir));
}

#[tokio::test]
async fn test_logout_from_anonymous_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    store.logout().await;
    assert_eq!(store.state().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_rehydration_round_trips_the_identity() {
    let dir = TempDir::new().unwrap();

    let original = {
        let store = seeded_store(&dir);
        store.initialize().await;
        store.login("agent@estate.com", "pw").await.unwrap()
    };

    // A fresh store over the same storage restores the same identity
    let restored_store = seeded_store(&dir);
    restored_store.initialize().await;

    assert_eq!(
        restored_store.state().await,
        SessionState::Authenticated(original)
    );
}

#[tokio::test]
async fn test_corrupt_storage_resolves_to_anonymous() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(SessionStorage::IDENTITY_FILE),
        "not a json identity",
    )
    .unwrap();

    let store = seeded_store(&dir);
    store.initialize().await;

    assert_eq!(store.state().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_any_and_all_permission_queries() {
    let dir = TempDir::new().unwrap();

    // Reduced two-permission agent table
    let table = RolePermissions::empty()
        .grant(Role::Agent, "view:dashboard")
        .grant(Role::Agent, "manage:tenants");
    let config = test_config(&dir).with_permissions(table);
    let store = SessionStore::new(config, Arc::new(StaticDirectory::seeded())).unwrap();
    store.initialize().await;

    store.login("agent@estate.com", "pw").await.unwrap();

    assert!(
        store
            .has_any_permission(&[
                Permission::from("manage:tenants"),
                Permission::from("delete:everything"),
            ])
            .await
    );
    assert!(
        !store
            .has_all_permissions(&[
                Permission::from("view:dashboard"),
                Permission::from("delete:everything"),
            ])
            .await
    );
}

#[tokio::test]
async fn test_empty_request_sets() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    // Not authenticated: both queries are false
    assert!(!store.has_any_permission(&[]).await);
    assert!(!store.has_all_permissions(&[]).await);

    store.login("tenant@estate.com", "pw").await.unwrap();

    // Authenticated: any-of an empty set is false, all-of is vacuously true
    assert!(!store.has_any_permission(&[]).await);
    assert!(store.has_all_permissions(&[]).await);
}

#[tokio::test]
async fn test_overlapping_logins_queue_and_last_writer_wins() {
    let dir = TempDir::new().unwrap();
    let config = AccessConfig::default()
        .with_storage_dir(dir.path())
        .with_auth_latency(Duration::from_millis(20));
    let store = Arc::new(
        SessionStore::new(config, Arc::new(StaticDirectory::seeded())).unwrap(),
    );
    store.initialize().await;

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.login("admin@estate.com", "pw").await })
    };
    // Give the first call a head start so the orderings are deterministic
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.login("agent@estate.com", "pw").await })
    };

    first.await.unwrap().unwrap();
    let agent = second.await.unwrap().unwrap();

    assert_eq!(store.current_identity().await, Some(agent.clone()));
    assert!(!store.is_loading());

    // Durable storage matches the final state
    let storage = SessionStorage::new(dir.path()).unwrap();
    assert_eq!(storage.load(), Some(agent));
}

#[tokio::test]
async fn test_signup_then_relogin_against_static_directory_fails() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    store.initialize().await;

    store
        .signup("fresh@estate.com", "pw", "Fresh", Role::Tenant)
        .await
        .unwrap();
    store.logout().await;

    // The static directory never learns about synthesized identities
    let result = store.login("fresh@estate.com", "pw").await;
    assert!(matches!(result, Err(AccessError::InvalidCredentials)));
}
