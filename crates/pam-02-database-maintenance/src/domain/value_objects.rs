//! Value objects for Database Maintenance

use super::errors::MaintenanceError;
use std::fmt;

/// Length of a bcrypt hash in modular crypt format.
pub const BCRYPT_HASH_LEN: usize = 60;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// A bcrypt password hash, checked for shape only.
///
/// `Debug` and `Display` never print the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(raw: impl Into<String>) -> Result<Self, MaintenanceError> {
        let raw = raw.into();
        let raw = raw.trim();

        if !BCRYPT_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            return Err(MaintenanceError::InvalidPasswordHash(
                "expected a bcrypt hash starting with $2a$, $2b$ or $2y$",
            ));
        }
        if raw.len() != BCRYPT_HASH_LEN {
            return Err(MaintenanceError::InvalidPasswordHash(
                "bcrypt hashes are 60 characters long",
            ));
        }
        let bytes = raw.as_bytes();
        if !(bytes[4].is_ascii_digit() && bytes[5].is_ascii_digit() && bytes[6] == b'$') {
            return Err(MaintenanceError::InvalidPasswordHash("malformed cost field"));
        }

        Ok(Self(raw.to_string()))
    }

    /// Raw hash for the insert statement only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn cost(&self) -> u32 {
        self.0[4..6].parse().unwrap_or(0)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash(bcrypt, cost {})", self.cost())
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}
