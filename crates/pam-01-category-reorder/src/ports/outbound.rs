//! Outbound Ports (Driven Ports / SPI)
//!
//! A store hands out transactions; every write of a run goes through one
//! [`CategoryTransaction`]. Dropping a transaction without committing must
//! discard its writes.

use crate::domain::entities::Category;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{CategoryKey, TransactionOptions};
use async_trait::async_trait;

/// Category table access
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Open a transaction with the given isolation and timeout.
    async fn begin(
        &self,
        options: &TransactionOptions,
    ) -> Result<Box<dyn CategoryTransaction>, StoreError>;

    /// Committed rows ordered by key.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Value the key generator will hand out next, without consuming it.
    async fn next_sequence_value(&self) -> Result<CategoryKey, StoreError>;
}

/// One open transaction on the category table
#[async_trait]
pub trait CategoryTransaction: Send {
    /// Block concurrent writers for the rest of the transaction.
    async fn lock_exclusive(&mut self) -> Result<(), StoreError>;

    /// Rows as seen inside the transaction, ordered by key.
    async fn list_categories(&mut self) -> Result<Vec<Category>, StoreError>;

    /// `SET key = new_key WHERE name = name`; returns affected rows.
    async fn rekey_by_name(&mut self, name: &str, new_key: CategoryKey) -> Result<u64, StoreError>;

    /// `SET key = to WHERE key = from`; returns affected rows.
    async fn rekey(&mut self, from: CategoryKey, to: CategoryKey) -> Result<u64, StoreError>;

    /// Set the key generator's next value to `max(key) + 1`; returns that value.
    async fn advance_sequence(&mut self) -> Result<CategoryKey, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}
