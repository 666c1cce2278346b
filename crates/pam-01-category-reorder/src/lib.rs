//! # PAM-01: Category Reorder Subsystem
//!
//! Renumbers the primary keys of the `kategori` table to match an
//! operator-supplied display order, without ever producing a duplicate key.
//!
//! ## Procedure
//!
//! One transaction, three phases:
//!
//! ```text
//! Unstaged ──Stage──→ Staged ──Commit order──→ Committed ──Resequence──→ Resequenced
//!   (current keys)     (max+offset+i)          (desired keys)           (serial > max key)
//! ```
//!
//! Staging keys are computed from the live maximum key inside the locked
//! transaction, so they are disjoint from both the current and the desired
//! key sets. Any failure rolls back to the unstaged state.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Unique Keys | No two rows share a key at any statement boundary |
//! | 2 | Disjoint Staging | Staging keys exceed every current and desired key |
//! | 3 | Exact Match | Every target name resolves to exactly one row |
//! | 4 | Sequence Ahead | After commit, the serial's next value exceeds the max key |
//!
//! ## Architecture
//!
//! - **Domain**: Categories, target order, renumber plan, phases, errors
//! - **Algorithms**: Target validation, staging range, planner, verification
//! - **Ports**: Inbound (`CategoryReorderApi`) and Outbound (`CategoryStore`, `CategoryTransaction`)
//! - **Adapters**: PostgreSQL (sqlx) and in-memory stores
//! - **Application**: Service orchestration

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryCategoryStore;
#[cfg(feature = "postgres")]
pub use adapters::PostgresCategoryStore;
pub use application::service::CategoryReorderService;
pub use config::{default_category_order, CategoryTableConfig, ReorderConfig};
pub use domain::entities::*;
pub use domain::errors::{ReorderError, StoreError};
pub use domain::value_objects::*;
pub use ports::inbound::CategoryReorderApi;
pub use ports::outbound::{CategoryStore, CategoryTransaction};

/// Subsystem label attached to every log event.
pub const SUBSYSTEM: &str = "category-reorder";
