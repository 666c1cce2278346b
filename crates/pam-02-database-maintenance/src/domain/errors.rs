//! Error types for Database Maintenance

use thiserror::Error;

/// Errors surfaced by the check and seeding services
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// Database unreachable or authentication refused
    #[error("Database connectivity failure: {message}")]
    Connectivity { message: String },

    /// A user with the same email or NIM already exists
    #[error("User already exists: {message}")]
    DuplicateUser { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    /// Seeding requested without a configured password hash
    #[error("No password hash configured (set PAM_TEST_USER_PASSWORD_HASH)")]
    MissingPasswordHash,

    #[error("Invalid password hash: {0}")]
    InvalidPasswordHash(&'static str),

    #[error("Invalid maintenance configuration: {0}")]
    InvalidConfig(String),
}

/// Errors reported by an `AccountStore` adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountStoreError {
    /// Unique constraint rejected an insert (SQLSTATE 23505)
    #[error("unique violation: {message}")]
    UniqueViolation { message: String },

    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("query failed: {message}")]
    Query { message: String },
}

impl From<AccountStoreError> for MaintenanceError {
    fn from(err: AccountStoreError) -> Self {
        match err {
            AccountStoreError::UniqueViolation { message } => {
                MaintenanceError::DuplicateUser { message }
            }
            AccountStoreError::Connection { message } => MaintenanceError::Connectivity { message },
            AccountStoreError::Query { message } => MaintenanceError::Query { message },
        }
    }
}
