//! Estate Core - shared foundation for the Estate access-control stack
//!
//! This crate defines the cross-cutting pieces every Estate crate relies on:
//! the unified error type with structured context, and the tracing-based
//! logging setup.

pub mod error;
pub mod logging;

pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
