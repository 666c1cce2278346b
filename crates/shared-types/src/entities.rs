//! # Platform Entities
//!
//! Enumerations shared between the maintenance subsystems. Stored values use
//! the platform's Indonesian vocabulary (`pengguna` = regular user).

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role column of the `pengguna` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular student account.
    #[default]
    Pengguna,
    /// Moderator with category and post management rights.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pengguna => "pengguna",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pengguna" => Ok(Role::Pengguna),
            "admin" => Ok(Role::Admin),
            other => Err(TypeError::UnknownRole(other.to_string())),
        }
    }
}
