//! # Aspirasi Maintenance Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Flows spanning several crates
//!     ├── flows.rs      # Seed, reorder, check on shared in-memory stores
//!     └── properties.rs # Randomized renumbering properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pam-tests
//! cargo bench -p pam-tests
//! ```

pub mod integration;
