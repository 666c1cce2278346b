//! Adapters for Category Reorder
//!
//! - `memory`: in-memory table for tests and demo runs
//! - `postgres`: sqlx-backed PostgreSQL table (feature `postgres`)

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sql;

pub use memory::{InMemoryCategoryStore, InMemoryTransaction};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresCategoryStore, PostgresTransaction};
pub use sql::CategoryStatements;
