//! # Shared Types Crate
//!
//! Value types used across the maintenance subsystems.
//!
//! ## Design Principles
//!
//! - **Identifiers are validated once**: table and column names are only ever
//!   interpolated into SQL through [`SqlIdentifier`], never as raw strings.
//! - **Secrets stay masked**: [`DatabaseUrl`] displays with its password
//!   replaced, so it can be logged freely.

pub mod database;
pub mod entities;
pub mod errors;
pub mod identifiers;

pub use database::{mask_database_url, DatabaseUrl};
pub use entities::Role;
pub use errors::TypeError;
pub use identifiers::SqlIdentifier;
