//! Algorithms module for Category Reorder
//!
//! Contains:
//! - Target matching (name → exactly one row)
//! - Staging range computation
//! - Renumber planner
//! - Post-commit verification

pub mod matching;
pub mod planner;
pub mod staging;
pub mod verification;

pub use matching::match_target;
pub use planner::build_plan;
pub use staging::{staging_base, staging_floor, staging_keys, staging_keys_below};
pub use verification::verify_against_target;
