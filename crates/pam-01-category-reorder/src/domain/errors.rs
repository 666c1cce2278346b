//! Error types for Category Reorder

use super::value_objects::{CategoryKey, RenumberPhase};
use thiserror::Error;

/// All errors that can abort a renumbering run
#[derive(Debug, Error)]
pub enum ReorderError {
    /// Target order has no entries
    #[error("Target order is empty")]
    EmptyTarget,

    /// Desired keys must be positive integers
    #[error("Desired key for {name:?} must be positive, got {key}")]
    NonPositiveKey { name: String, key: CategoryKey },

    /// Target entry with a blank category name
    #[error("Target entry for key {key} has an empty category name")]
    EmptyName { key: CategoryKey },

    /// Two target entries request the same key
    #[error("Desired key {key} appears more than once in the target order")]
    DuplicateKey { key: CategoryKey },

    /// Two target entries reference the same name
    #[error("Category name {name:?} appears more than once in the target order")]
    DuplicateName { name: String },

    /// Target length differs from the number of rows in the table
    #[error("Target order has {target} entries but the table holds {existing} categories")]
    CountMismatch { target: usize, existing: usize },

    /// A target name has no matching row
    #[error("No category named {name:?} exists")]
    UnmatchedName { name: String },

    /// A target name matches more than one row
    #[error("Category name {name:?} matches {matches} rows")]
    AmbiguousName { name: String, matches: usize },

    /// Staging keys fit neither above nor below the live keys within the
    /// key column's range
    #[error("Staging range starting at {base} for {count} rows exceeds maximum key {max_key}, and no room is left below the lowest key")]
    StagingOverflow {
        base: CategoryKey,
        count: usize,
        max_key: CategoryKey,
    },

    /// The store rejected an update because of a uniqueness constraint
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The store became unreachable
    #[error("Database connectivity failure: {message}")]
    Connectivity { message: String },

    /// Any other store failure
    #[error("Store error: {message}")]
    Store { message: String },

    /// Phase transitions must follow Unstaged → Staged → Committed → Resequenced
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidPhaseTransition {
        from: RenumberPhase,
        to: RenumberPhase,
    },

    /// An update touched an unexpected number of rows
    #[error("{phase} update of key {key} affected {affected} rows, expected 1")]
    UnexpectedRowCount {
        phase: RenumberPhase,
        key: CategoryKey,
        affected: u64,
    },

    /// Table state at a phase boundary contradicts the plan
    #[error("Invariant violated after {phase} phase: {detail}")]
    PhaseInvariantViolated { phase: RenumberPhase, detail: String },

    /// Configuration is unusable
    #[error("Invalid reorder configuration: {0}")]
    InvalidConfig(String),
}

impl ReorderError {
    /// Failures caused by the operator's input rather than the store.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ReorderError::EmptyTarget
                | ReorderError::NonPositiveKey { .. }
                | ReorderError::EmptyName { .. }
                | ReorderError::DuplicateKey { .. }
                | ReorderError::DuplicateName { .. }
                | ReorderError::CountMismatch { .. }
                | ReorderError::UnmatchedName { .. }
                | ReorderError::AmbiguousName { .. }
        )
    }
}

/// Errors reported by a `CategoryStore` adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Unique constraint rejected a write (SQLSTATE 23505)
    #[error("unique violation: {message}")]
    UniqueViolation { message: String },

    /// Connection lost, pool exhausted or TLS failure
    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("query failed: {message}")]
    Query { message: String },

    /// Transaction was already committed or rolled back
    #[error("transaction already finished")]
    TransactionFinished,
}

impl From<StoreError> for ReorderError {
    fn from(err: StoreError) -> Self {
        match err {
            // Surface the store's message verbatim
            StoreError::UniqueViolation { message } => ReorderError::ConstraintViolation { message },
            StoreError::Connection { message } => ReorderError::Connectivity { message },
            StoreError::Query { message } => ReorderError::Store { message },
            finished @ StoreError::TransactionFinished => ReorderError::Store {
                message: finished.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReorderError::UnmatchedName {
            name: "Akademik".to_string(),
        };
        assert_eq!(err.to_string(), "No category named \"Akademik\" exists");

        let err = ReorderError::CountMismatch {
            target: 10,
            existing: 9,
        };
        assert!(err.to_string().contains("10 entries"));
        assert!(err.to_string().contains("9 categories"));
    }

    #[test]
    fn test_unique_violation_message_verbatim() {
        let store = StoreError::UniqueViolation {
            message: "duplicate key value violates unique constraint \"kategori_pkey\"".to_string(),
        };
        let err: ReorderError = store.into();

        match err {
            ReorderError::ConstraintViolation { message } => {
                assert!(message.contains("kategori_pkey"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_connection_maps_to_connectivity() {
        let err: ReorderError = StoreError::Connection {
            message: "reset by peer".to_string(),
        }
        .into();
        assert!(matches!(err, ReorderError::Connectivity { .. }));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_input_errors_classified() {
        assert!(ReorderError::EmptyTarget.is_input_error());
        assert!(ReorderError::EmptyName { key: 3 }.is_input_error());
        assert!(ReorderError::AmbiguousName {
            name: "X".into(),
            matches: 2
        }
        .is_input_error());
        assert!(!ReorderError::InvalidPhaseTransition {
            from: RenumberPhase::Unstaged,
            to: RenumberPhase::Committed
        }
        .is_input_error());
    }
}
