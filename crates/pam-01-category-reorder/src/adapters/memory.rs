//! In-memory category store
//!
//! Behaves like the PostgreSQL table closely enough for the renumbering
//! procedure: key uniqueness is checked on every single update, transactions
//! work on a private snapshot that replaces the committed state on commit, and
//! the key generator is non-transactional like a PostgreSQL sequence.

use crate::domain::entities::Category;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{CategoryKey, TransactionOptions};
use crate::ports::outbound::{CategoryStore, CategoryTransaction};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

const PRIMARY_KEY_CONSTRAINT: &str = "kategori_pkey";

#[derive(Debug, Default)]
struct Shared {
    committed: Vec<Category>,
    next_value: CategoryKey,
    /// Writes allowed before an injected connection failure
    fail_after: Option<usize>,
    writes: usize,
    locks_taken: usize,
    record_history: bool,
    history: Vec<Vec<Category>>,
}

impl Shared {
    /// Count a write and fire the injected failure when due.
    fn check_fault(&mut self) -> Result<(), StoreError> {
        if let Some(remaining) = self.fail_after {
            if remaining == 0 {
                self.fail_after = None;
                return Err(StoreError::Connection {
                    message: "server closed the connection unexpectedly".to_string(),
                });
            }
            self.fail_after = Some(remaining - 1);
        }
        Ok(())
    }
}

/// Category table held in memory.
///
/// Cloning yields another handle to the same table.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCategoryStore {
    shared: Arc<Mutex<Shared>>,
}

impl InMemoryCategoryStore {
    /// Empty table; the generator starts at 1.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                next_value: 1,
                ..Shared::default()
            })),
        }
    }

    /// Table seeded with `categories`. Keys must be distinct; names are not
    /// checked so ambiguous matches can be reproduced.
    pub fn with_categories(
        categories: impl IntoIterator<Item = Category>,
    ) -> Result<Self, StoreError> {
        let committed: Vec<Category> = categories.into_iter().collect();
        if let Some(key) = first_duplicate_key(&committed) {
            return Err(unique_violation(key));
        }
        let next_value = committed.iter().map(|c| c.key).max().unwrap_or(0) + 1;

        Ok(Self {
            shared: Arc::new(Mutex::new(Shared {
                committed,
                next_value,
                ..Shared::default()
            })),
        })
    }

    /// Insert with a generated key, like `INSERT ... DEFAULT VALUES`.
    ///
    /// The generator value is consumed even when the insert fails.
    pub fn insert(&self, name: impl Into<String>) -> Result<Category, StoreError> {
        let mut shared = self.shared.lock();
        let key = shared.next_value;
        shared.next_value += 1;

        if shared.committed.iter().any(|c| c.key == key) {
            return Err(unique_violation(key));
        }
        let category = Category::new(key, name);
        shared.committed.push(category.clone());
        Ok(category)
    }

    /// Committed rows ordered by key.
    pub fn snapshot(&self) -> Vec<Category> {
        sorted(self.shared.lock().committed.clone())
    }

    pub fn set_next_sequence_value(&self, value: CategoryKey) {
        self.shared.lock().next_value = value;
    }

    /// Let `writes` more write statements succeed, then drop the connection.
    pub fn fail_after_statements(&self, writes: usize) {
        self.shared.lock().fail_after = Some(writes);
    }

    /// Record the in-transaction table after every write statement.
    pub fn record_history(&self, enabled: bool) {
        self.shared.lock().record_history = enabled;
    }

    pub fn history(&self) -> Vec<Vec<Category>> {
        self.shared.lock().history.clone()
    }

    /// Successful write statements so far.
    pub fn write_count(&self) -> usize {
        self.shared.lock().writes
    }

    pub fn locks_taken(&self) -> usize {
        self.shared.lock().locks_taken
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn begin(
        &self,
        _options: &TransactionOptions,
    ) -> Result<Box<dyn CategoryTransaction>, StoreError> {
        let working = self.shared.lock().committed.clone();
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.shared),
            working: Some(working),
        }))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.snapshot())
    }

    async fn next_sequence_value(&self) -> Result<CategoryKey, StoreError> {
        Ok(self.shared.lock().next_value)
    }
}

/// Snapshot transaction over an [`InMemoryCategoryStore`]
pub struct InMemoryTransaction {
    shared: Arc<Mutex<Shared>>,
    /// `None` once committed or rolled back
    working: Option<Vec<Category>>,
}

impl InMemoryTransaction {
    fn working(&mut self) -> Result<&mut Vec<Category>, StoreError> {
        self.working.as_mut().ok_or(StoreError::TransactionFinished)
    }

    fn write<F>(&mut self, apply: F) -> Result<u64, StoreError>
    where
        F: FnOnce(&mut Vec<Category>) -> Result<u64, StoreError>,
    {
        let mut shared = self.shared.lock();
        let working = self.working.as_mut().ok_or(StoreError::TransactionFinished)?;
        shared.check_fault()?;

        let affected = apply(working)?;
        shared.writes += 1;
        if shared.record_history {
            shared.history.push(sorted(working.clone()));
        }
        Ok(affected)
    }
}

#[async_trait]
impl CategoryTransaction for InMemoryTransaction {
    async fn lock_exclusive(&mut self) -> Result<(), StoreError> {
        self.working()?;
        self.shared.lock().locks_taken += 1;
        Ok(())
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        Ok(sorted(self.working()?.clone()))
    }

    async fn rekey_by_name(&mut self, name: &str, new_key: CategoryKey) -> Result<u64, StoreError> {
        self.write(|rows| {
            let matched = rows.iter().filter(|c| c.name == name).count();
            if matched == 0 {
                return Ok(0);
            }
            let taken = rows.iter().any(|c| c.key == new_key && c.name != name);
            if taken || matched > 1 {
                return Err(unique_violation(new_key));
            }
            for row in rows.iter_mut().filter(|c| c.name == name) {
                row.key = new_key;
            }
            Ok(matched as u64)
        })
    }

    async fn rekey(&mut self, from: CategoryKey, to: CategoryKey) -> Result<u64, StoreError> {
        self.write(|rows| {
            let Some(index) = rows.iter().position(|c| c.key == from) else {
                return Ok(0);
            };
            if from != to && rows.iter().any(|c| c.key == to) {
                return Err(unique_violation(to));
            }
            rows[index].key = to;
            Ok(1)
        })
    }

    async fn advance_sequence(&mut self) -> Result<CategoryKey, StoreError> {
        let mut next = 0;
        self.write(|rows| {
            next = rows.iter().map(|c| c.key).max().unwrap_or(0) + 1;
            Ok(0)
        })?;
        // Sequences ignore rollback
        self.shared.lock().next_value = next;
        Ok(next)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let working = self.working.take().ok_or(StoreError::TransactionFinished)?;
        self.shared.lock().committed = working;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.working.take().ok_or(StoreError::TransactionFinished)?;
        Ok(())
    }
}

fn sorted(mut rows: Vec<Category>) -> Vec<Category> {
    rows.sort_by_key(|c| c.key);
    rows
}

fn first_duplicate_key(rows: &[Category]) -> Option<CategoryKey> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().map(|c| c.key).find(|key| !seen.insert(*key))
}

fn unique_violation(key: CategoryKey) -> StoreError {
    StoreError::UniqueViolation {
        message: format!(
            "duplicate key value violates unique constraint \"{PRIMARY_KEY_CONSTRAINT}\": Key (id)=({key}) already exists."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryCategoryStore {
        InMemoryCategoryStore::with_categories([
            Category::new(1, "A"),
            Category::new(2, "B"),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_duplicate_seed_keys() {
        let result = InMemoryCategoryStore::with_categories([
            Category::new(1, "A"),
            Category::new(1, "B"),
        ]);
        assert!(matches!(result, Err(StoreError::UniqueViolation { .. })));
    }

    #[test]
    fn test_insert_uses_generator() {
        let store = store();
        assert_eq!(store.insert("C").unwrap(), Category::new(3, "C"));

        // Failed inserts still consume generator values
        store.set_next_sequence_value(1);
        for _ in 0..3 {
            assert!(matches!(store.insert("D"), Err(StoreError::UniqueViolation { .. })));
        }
        assert_eq!(store.insert("D").unwrap().key, 4);
    }

    #[tokio::test]
    async fn test_update_enforces_uniqueness() {
        let store = store();
        let mut tx = store.begin(&TransactionOptions::default()).await.unwrap();

        let err = tx.rekey_by_name("A", 2).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { ref message } if message.contains("(id)=(2)")));

        assert!(matches!(tx.rekey(1, 2).await, Err(StoreError::UniqueViolation { .. })));
        assert_eq!(tx.rekey(1, 5).await.unwrap(), 1);
        assert_eq!(tx.rekey(1, 6).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_publishes_rollback_discards() {
        let store = store();

        let mut tx = store.begin(&TransactionOptions::default()).await.unwrap();
        tx.rekey_by_name("A", 10).await.unwrap();
        assert_eq!(store.snapshot()[0], Category::new(1, "A"));
        tx.rollback().await.unwrap();
        assert_eq!(store.snapshot()[0], Category::new(1, "A"));

        let mut tx = store.begin(&TransactionOptions::default()).await.unwrap();
        tx.rekey_by_name("A", 10).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.snapshot()[1], Category::new(10, "A"));

        assert!(matches!(tx.commit().await, Err(StoreError::TransactionFinished)));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = store();
        store.fail_after_statements(1);

        let mut tx = store.begin(&TransactionOptions::default()).await.unwrap();
        assert!(tx.rekey_by_name("A", 10).await.is_ok());
        assert!(matches!(
            tx.rekey_by_name("B", 11).await,
            Err(StoreError::Connection { .. })
        ));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_advance_sequence_survives_rollback() {
        let store = store();
        let mut tx = store.begin(&TransactionOptions::default()).await.unwrap();
        tx.rekey_by_name("B", 40).await.unwrap();
        assert_eq!(tx.advance_sequence().await.unwrap(), 41);
        tx.rollback().await.unwrap();

        assert_eq!(store.next_sequence_value().await.unwrap(), 41);
        assert_eq!(store.snapshot().last().unwrap().key, 2);
    }

    #[tokio::test]
    async fn test_history_records_writes() {
        let store = store();
        store.record_history(true);

        let mut tx = store.begin(&TransactionOptions::default()).await.unwrap();
        tx.rekey_by_name("A", 7).await.unwrap();
        tx.rekey_by_name("B", 8).await.unwrap();

        let history = store.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], vec![Category::new(2, "B"), Category::new(7, "A")]);
    }
}
