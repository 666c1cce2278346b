//! # PAM-02: Database Maintenance Subsystem
//!
//! Two operator tasks that share the platform's account tables:
//!
//! - **Connectivity check**: authenticate, count users, categories and posts,
//!   list a few sample users, optionally seed a first user into an empty
//!   database.
//! - **Test-user seeding**: make sure the accounts the mobile client's test
//!   suite logs in with exist, creating only the missing ones.
//!
//! Password hashing is not done here; the seeder receives a ready bcrypt hash
//! from configuration.
//!
//! ## Architecture
//!
//! - **Domain**: Users, fixtures, summaries, password hash, errors
//! - **Ports**: Inbound (`DatabaseCheckApi`, `TestUserSeedingApi`) and Outbound (`AccountStore`)
//! - **Adapters**: PostgreSQL (sqlx) and in-memory stores
//! - **Application**: Check and seeding services

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryAccountStore;
#[cfg(feature = "postgres")]
pub use adapters::PostgresAccountStore;
pub use application::{DatabaseCheckService, TestUserSeeder};
pub use config::{CheckConfig, SchemaConfig};
pub use domain::entities::*;
pub use domain::errors::{AccountStoreError, MaintenanceError};
pub use domain::value_objects::PasswordHash;
pub use ports::inbound::{DatabaseCheckApi, TestUserSeedingApi};
pub use ports::outbound::AccountStore;

/// Subsystem label for connectivity check events.
pub const CHECK_SUBSYSTEM: &str = "database-check";

/// Subsystem label for seeding events.
pub const SEED_SUBSYSTEM: &str = "test-user-seeding";
