//! Error types for the role and confirmation subsystem
//!
//! Most failure paths here are deliberately non-fatal: malformed role
//! entries are skipped during config load, and listener panics are caught
//! at the switch site. The errors that do surface to callers are below.

use thiserror::Error;

/// Errors reported by role management operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    /// Switch target does not exist. The current role is left unchanged.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
