//! In-memory account store

use crate::domain::entities::{NewUser, User};
use crate::domain::errors::AccountStoreError;
use crate::ports::outbound::AccountStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    next_id: i64,
    categories: u64,
    posts: u64,
    offline: bool,
}

/// Account tables held in memory; clones share state.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAccountStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(categories: u64, posts: u64) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            state.categories = categories;
            state.posts = posts;
        }
        store
    }

    /// Simulate an unreachable server.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().users.clone()
    }

    fn online(&self) -> Result<parking_lot::MutexGuard<'_, State>, AccountStoreError> {
        let state = self.state.lock();
        if state.offline {
            return Err(AccountStoreError::Connection {
                message: "connection refused".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn ping(&self) -> Result<(), AccountStoreError> {
        self.online().map(|_| ())
    }

    async fn count_users(&self) -> Result<u64, AccountStoreError> {
        Ok(self.online()?.users.len() as u64)
    }

    async fn count_categories(&self) -> Result<u64, AccountStoreError> {
        Ok(self.online()?.categories)
    }

    async fn count_posts(&self) -> Result<u64, AccountStoreError> {
        Ok(self.online()?.posts)
    }

    async fn sample_users(&self, limit: u32) -> Result<Vec<User>, AccountStoreError> {
        let state = self.online()?;
        let mut users = state.users.clone();
        users.sort_by_key(|u| u.id);
        users.truncate(limit as usize);
        Ok(users)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AccountStoreError> {
        Ok(self.online()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AccountStoreError> {
        let mut state = self.online()?;

        if let Some(existing) = state
            .users
            .iter()
            .find(|u| u.email == user.email || u.nim == user.nim)
        {
            let (column, value) = if existing.email == user.email {
                ("email", &user.email)
            } else {
                ("nim", &user.nim)
            };
            return Err(AccountStoreError::UniqueViolation {
                message: format!("Key ({column})=({value}) already exists."),
            });
        }

        state.next_id += 1;
        let created = User {
            id: state.next_id,
            nim: user.nim.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        };
        state.users.push(created.clone());
        Ok(created)
    }
}
