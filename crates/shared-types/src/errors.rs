//! # Error Types
//!
//! Errors raised while constructing shared value types.

use thiserror::Error;

/// Errors produced when parsing shared value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Identifier cannot be safely interpolated into SQL.
    #[error("Invalid SQL identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: &'static str },

    /// Role string is not one of the platform roles.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Database URL is empty or has no scheme.
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(&'static str),
}
