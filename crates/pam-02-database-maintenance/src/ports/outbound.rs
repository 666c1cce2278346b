//! Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::{NewUser, User};
use crate::domain::errors::AccountStoreError;
use async_trait::async_trait;

/// Access to the platform's account and content tables
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Round trip to the server; fails when the connection or login fails.
    async fn ping(&self) -> Result<(), AccountStoreError>;

    async fn count_users(&self) -> Result<u64, AccountStoreError>;

    async fn count_categories(&self) -> Result<u64, AccountStoreError>;

    async fn count_posts(&self) -> Result<u64, AccountStoreError>;

    /// Up to `limit` users, lowest id first.
    async fn sample_users(&self, limit: u32) -> Result<Vec<User>, AccountStoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AccountStoreError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, AccountStoreError>;
}
