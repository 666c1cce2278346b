//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{DatabaseSummary, SeedReport, TestUserFixture};
use crate::domain::errors::MaintenanceError;
use async_trait::async_trait;

/// Connectivity and content check
#[async_trait]
pub trait DatabaseCheckApi: Send + Sync {
    /// Authenticate, count the platform tables and list sample users.
    async fn check(&self) -> Result<DatabaseSummary, MaintenanceError>;
}

/// Test account provisioning
#[async_trait]
pub trait TestUserSeedingApi: Send + Sync {
    /// Create each fixture whose email is not registered yet.
    async fn seed(&self, fixtures: &[TestUserFixture]) -> Result<SeedReport, MaintenanceError>;
}
