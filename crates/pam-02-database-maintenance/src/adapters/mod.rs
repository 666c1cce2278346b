//! Adapters for Database Maintenance

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sql;

pub use memory::InMemoryAccountStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresAccountStore;
pub use sql::AccountStatements;
