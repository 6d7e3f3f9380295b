//! Session Lifecycle Module
//!
//! The session store owning the single current identity, and the durable
//! persistence layer it synchronizes on every transition.

pub mod storage;
pub mod store;

pub use storage::SessionStorage;
pub use store::{SessionState, SessionStore};
