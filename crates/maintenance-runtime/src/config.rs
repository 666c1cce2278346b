//! # Runtime Configuration
//!
//! Loaded from environment variables. A value that cannot be parsed is
//! reported with `warn!` and the default is kept; [`RuntimeConfig::validate`]
//! then rejects combinations the commands cannot work with.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | (required unless `--in-memory`) |
//! | `PAM_DB_MAX_CONNECTIONS` | `5` |
//! | `PAM_DB_CONNECT_TIMEOUT_SECS` | `10` |
//! | `PAM_REORDER_STAGING_OFFSET` | `100` |
//! | `PAM_REORDER_ISOLATION` | `serializable` |
//! | `PAM_REORDER_LOCK_TABLE` | `true` |
//! | `PAM_REORDER_STATEMENT_TIMEOUT_MS` | unset |
//! | `PAM_REORDER_VERIFY` | `true` |
//! | `PAM_TEST_USER_PASSWORD_HASH` | unset |
//! | `PAM_SEQUELIZE_TIMESTAMPS` | `true` |

use crate::RUNTIME_SUBSYSTEM;
use aspirasi_telemetry::log_event;
use pam_01_category_reorder::{IsolationLevel, ReorderConfig, ReorderError};
use pam_02_database_maintenance::{MaintenanceError, PasswordHash, SchemaConfig};
use shared_types::{DatabaseUrl, TypeError};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("DATABASE_URL is unusable: {0}")]
    DatabaseUrl(#[from] TypeError),

    #[error("PAM_TEST_USER_PASSWORD_HASH is not set")]
    MissingPasswordHash,

    #[error("PAM_TEST_USER_PASSWORD_HASH is unusable: {0}")]
    PasswordHash(MaintenanceError),

    #[error("PAM_DB_MAX_CONNECTIONS must be at least 1")]
    NoConnections,

    #[error(transparent)]
    Reorder(#[from] ReorderError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub database_url: Option<DatabaseUrl>,
    /// Pool size; one connection is enough for every command.
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub reorder: ReorderConfig,
    pub schema: SchemaConfig,
    /// Raw bcrypt hash for seeded accounts, parsed on use.
    pub test_user_password_hash: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            connect_timeout_secs: 10,
            reorder: ReorderConfig::default(),
            schema: SchemaConfig::default(),
            test_user_password_hash: None,
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get("DATABASE_URL") {
            match DatabaseUrl::new(raw) {
                Ok(url) => config.database_url = Some(url),
                Err(e) => {
                    log_event!(warn, RUNTIME_SUBSYSTEM, "ignoring DATABASE_URL", error = %e)
                }
            }
        }

        parse_into(&get, "PAM_DB_MAX_CONNECTIONS", &mut config.max_connections);
        parse_into(&get, "PAM_DB_CONNECT_TIMEOUT_SECS", &mut config.connect_timeout_secs);
        parse_into(&get, "PAM_REORDER_STAGING_OFFSET", &mut config.reorder.staging_offset);
        parse_into(&get, "PAM_REORDER_ISOLATION", &mut config.reorder.isolation);
        parse_flag_into(&get, "PAM_REORDER_LOCK_TABLE", &mut config.reorder.lock_table);
        parse_flag_into(&get, "PAM_REORDER_VERIFY", &mut config.reorder.verify_after_commit);
        parse_flag_into(&get, "PAM_SEQUELIZE_TIMESTAMPS", &mut config.schema.timestamps);

        let mut timeout = 0u64;
        if parse_into(&get, "PAM_REORDER_STATEMENT_TIMEOUT_MS", &mut timeout) {
            config.reorder.statement_timeout_ms = Some(timeout);
        }

        config.test_user_password_hash = get("PAM_TEST_USER_PASSWORD_HASH");
        config
    }

    /// Reject values no command can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        self.reorder.validate()?;
        if self.test_user_password_hash.is_some() {
            self.password_hash()?;
        }
        Ok(())
    }

    pub fn require_database_url(&self) -> Result<&DatabaseUrl, ConfigError> {
        self.database_url.as_ref().ok_or(ConfigError::MissingDatabaseUrl)
    }

    pub fn password_hash(&self) -> Result<PasswordHash, ConfigError> {
        let raw = self
            .test_user_password_hash
            .as_deref()
            .ok_or(ConfigError::MissingPasswordHash)?;
        PasswordHash::new(raw).map_err(ConfigError::PasswordHash)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Shorthand used in startup logs.
    pub fn isolation(&self) -> IsolationLevel {
        self.reorder.isolation
    }
}

/// Parse `key` into `slot`; returns whether a value was applied.
fn parse_into<T>(get: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) -> bool
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get(key) else {
        return false;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(e) => {
            log_event!(
                warn,
                RUNTIME_SUBSYSTEM,
                "ignoring unparsable setting, keeping default",
                key = key,
                value = %raw,
                error = %e
            );
            false
        }
    }
}

fn parse_flag_into(get: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut bool) {
    let Some(raw) = get(key) else {
        return;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => *slot = true,
        "0" | "false" | "no" | "off" => *slot = false,
        _ => log_event!(
            warn,
            RUNTIME_SUBSYSTEM,
            "ignoring unparsable flag, keeping default",
            key = key,
            value = %raw
        ),
    }
}
