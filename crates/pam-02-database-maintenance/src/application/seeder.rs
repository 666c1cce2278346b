//! Test-user seeding service

use crate::domain::entities::{SeedOutcome, SeedReport, TestUserFixture};
use crate::domain::errors::MaintenanceError;
use crate::domain::value_objects::PasswordHash;
use crate::ports::inbound::TestUserSeedingApi;
use crate::ports::outbound::AccountStore;
use crate::SEED_SUBSYSTEM;
use aspirasi_telemetry::log_event;
use async_trait::async_trait;
use tracing::instrument;

/// Creates the fixtures that are missing, leaves existing accounts alone.
pub struct TestUserSeeder<S: AccountStore> {
    store: S,
    password_hash: PasswordHash,
}

impl<S: AccountStore> TestUserSeeder<S> {
    pub fn new(store: S, password_hash: PasswordHash) -> Self {
        Self {
            store,
            password_hash,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seed one fixture.
    pub async fn ensure(&self, fixture: &TestUserFixture) -> Result<SeedOutcome, MaintenanceError> {
        if let Some(existing) = self.store.find_user_by_email(&fixture.email).await? {
            log_event!(
                info,
                SEED_SUBSYSTEM,
                "test user already exists",
                email = %existing.email,
                nim = %existing.nim
            );
            return Ok(SeedOutcome::AlreadyExists(existing));
        }

        let created = self
            .store
            .create_user(&fixture.to_new_user(&self.password_hash))
            .await?;
        log_event!(
            info,
            SEED_SUBSYSTEM,
            "test user created",
            id = created.id,
            email = %created.email,
            nim = %created.nim
        );
        Ok(SeedOutcome::Created(created))
    }
}

#[async_trait]
impl<S: AccountStore> TestUserSeedingApi for TestUserSeeder<S> {
    #[instrument(skip(self, fixtures), fields(subsystem = SEED_SUBSYSTEM, fixtures = fixtures.len()))]
    async fn seed(&self, fixtures: &[TestUserFixture]) -> Result<SeedReport, MaintenanceError> {
        let mut report = SeedReport::default();
        for fixture in fixtures {
            report.outcomes.push(self.ensure(fixture).await?);
        }
        Ok(report)
    }
}
