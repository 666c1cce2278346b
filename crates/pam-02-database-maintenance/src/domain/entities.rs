//! Core entities for Database Maintenance

use super::value_objects::PasswordHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Role;
use std::fmt;

/// A row of the `pengguna` table, without the password hash
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Student number
    pub nim: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Insert payload for a new account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub nim: String,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub role: Role,
}

/// An account the mobile client's test suite expects to exist
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUserFixture {
    pub nim: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl TestUserFixture {
    pub fn new(nim: &str, name: &str, email: &str) -> Self {
        Self {
            nim: nim.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Pengguna,
        }
    }

    /// Login account used by the mobile client's tests.
    pub fn primary() -> Self {
        Self::new("12345678901", "Test User Flutter", "test@example.com")
    }

    /// Second account for registration-conflict tests.
    pub fn secondary() -> Self {
        Self::new("99999999999", "Unique Test User", "unique@example.com")
    }

    /// First account created by the connectivity check in an empty database.
    pub fn initial() -> Self {
        Self::new("12345678901", "Test User", "test@example.com")
    }

    /// Fixtures created by `seed-test-users`.
    pub fn defaults() -> Vec<Self> {
        vec![Self::primary(), Self::secondary()]
    }

    pub fn to_new_user(&self, password_hash: &PasswordHash) -> NewUser {
        NewUser {
            nim: self.nim.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            password_hash: password_hash.clone(),
            role: self.role,
        }
    }
}

/// What seeding did for one fixture
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum SeedOutcome {
    Created(User),
    AlreadyExists(User),
}

impl SeedOutcome {
    pub fn user(&self) -> &User {
        match self {
            SeedOutcome::Created(user) | SeedOutcome::AlreadyExists(user) => user,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, SeedOutcome::Created(_))
    }
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, user) = match self {
            SeedOutcome::Created(user) => ("created", user),
            SeedOutcome::AlreadyExists(user) => ("already exists", user),
        };
        write!(
            f,
            "{} <{}> NIM {} ({}): {label}",
            user.name, user.email, user.nim, user.role
        )
    }
}

/// Result of one seeding run
#[derive(Clone, Debug, Default, Serialize)]
pub struct SeedReport {
    pub outcomes: Vec<SeedOutcome>,
}

impl SeedReport {
    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.was_created()).count()
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test users:")?;
        for outcome in &self.outcomes {
            writeln!(f, "  {outcome}")?;
        }
        write!(
            f,
            "{} created, {} already present",
            self.created(),
            self.outcomes.len() - self.created()
        )
    }
}

/// Connectivity check result
#[derive(Clone, Debug, Serialize)]
pub struct DatabaseSummary {
    /// Masked connection URL or another label for the target
    pub database: String,
    pub user_count: u64,
    pub category_count: u64,
    pub post_count: u64,
    pub sample_users: Vec<User>,
    /// Present when an empty database was seeded during the check
    pub seeded: Option<SeedOutcome>,
    pub checked_at: DateTime<Utc>,
}

impl fmt::Display for DatabaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Database: {}", self.database)?;
        writeln!(f, "Users: {}", self.user_count)?;
        if self.sample_users.is_empty() {
            writeln!(f, "  (no users)")?;
        }
        for (i, user) in self.sample_users.iter().enumerate() {
            writeln!(f, "  {}. {} ({}) - NIM: {}", i + 1, user.name, user.email, user.nim)?;
        }
        writeln!(f, "Categories: {}", self.category_count)?;
        write!(f, "Posts: {}", self.post_count)?;
        if let Some(seeded) = &self.seeded {
            write!(f, "\nSeeded: {seeded}")?;
        }
        Ok(())
    }
}
