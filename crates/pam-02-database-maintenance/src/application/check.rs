//! Connectivity check service

use super::seeder::TestUserSeeder;
use crate::config::CheckConfig;
use crate::domain::entities::{DatabaseSummary, TestUserFixture};
use crate::domain::errors::MaintenanceError;
use crate::domain::value_objects::PasswordHash;
use crate::ports::inbound::DatabaseCheckApi;
use crate::ports::outbound::AccountStore;
use crate::CHECK_SUBSYSTEM;
use aspirasi_telemetry::log_event;
use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

/// Verifies the database answers and reports what it holds
pub struct DatabaseCheckService<S: AccountStore + Clone> {
    store: S,
    config: CheckConfig,
    /// Masked URL or other label shown in the summary
    database: String,
    password_hash: Option<PasswordHash>,
}

impl<S: AccountStore + Clone> DatabaseCheckService<S> {
    pub fn new(store: S, database: impl Into<String>) -> Self {
        Self::with_config(store, database, CheckConfig::default())
    }

    pub fn with_config(store: S, database: impl Into<String>, config: CheckConfig) -> Self {
        Self {
            store,
            config,
            database: database.into(),
            password_hash: None,
        }
    }

    /// Hash used when `seed_if_empty` creates the initial user.
    pub fn with_password_hash(mut self, hash: PasswordHash) -> Self {
        self.password_hash = Some(hash);
        self
    }
}

#[async_trait]
impl<S: AccountStore + Clone> DatabaseCheckApi for DatabaseCheckService<S> {
    #[instrument(skip(self), fields(subsystem = CHECK_SUBSYSTEM, database = %self.database))]
    async fn check(&self) -> Result<DatabaseSummary, MaintenanceError> {
        self.config.validate()?;
        let seed_hash = match (self.config.seed_if_empty, &self.password_hash) {
            (true, None) => return Err(MaintenanceError::MissingPasswordHash),
            (true, Some(hash)) => Some(hash.clone()),
            (false, _) => None,
        };

        log_event!(info, CHECK_SUBSYSTEM, "testing database connection");
        self.store.ping().await?;

        let user_count = self.store.count_users().await?;
        let sample_users = if user_count > 0 {
            self.store.sample_users(self.config.sample_limit).await?
        } else {
            log_event!(info, CHECK_SUBSYSTEM, "database is empty, no users found");
            Vec::new()
        };
        let category_count = self.store.count_categories().await?;
        let post_count = self.store.count_posts().await?;

        log_event!(
            info,
            CHECK_SUBSYSTEM,
            "database contents counted",
            users = user_count,
            categories = category_count,
            posts = post_count
        );

        let seeded = match seed_hash {
            Some(hash) if user_count == 0 => {
                let seeder = TestUserSeeder::new(self.store.clone(), hash);
                Some(seeder.ensure(&TestUserFixture::initial()).await?)
            }
            _ => None,
        };

        log_event!(info, CHECK_SUBSYSTEM, "database connection and structure verified");
        Ok(DatabaseSummary {
            database: self.database.clone(),
            user_count,
            category_count,
            post_count,
            sample_users,
            seeded,
            checked_at: Utc::now(),
        })
    }
}
