//! Configuration for Database Maintenance Subsystem

use crate::domain::errors::MaintenanceError;
use serde::{Deserialize, Serialize};
use shared_types::SqlIdentifier;

/// Table names of the platform schema
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub users_table: SqlIdentifier,
    pub categories_table: SqlIdentifier,
    pub posts_table: SqlIdentifier,
    /// Tables carry ORM-managed `"createdAt"`/`"updatedAt"` columns
    pub timestamps: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            users_table: SqlIdentifier::from_static("pengguna"),
            categories_table: SqlIdentifier::from_static("kategori"),
            posts_table: SqlIdentifier::from_static("postingan"),
            timestamps: true,
        }
    }
}

/// Connectivity check configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Sample users listed in the summary
    pub sample_limit: u32,
    /// Create the initial test user when the user table is empty
    pub seed_if_empty: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            sample_limit: 5,
            seed_if_empty: false,
        }
    }
}

impl CheckConfig {
    pub fn validate(&self) -> Result<(), MaintenanceError> {
        if self.sample_limit > 100 {
            return Err(MaintenanceError::InvalidConfig(format!(
                "sample_limit {} exceeds 100",
                self.sample_limit
            )));
        }
        Ok(())
    }
}
