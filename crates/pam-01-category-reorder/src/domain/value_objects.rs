//! Value objects for Category Reorder

use super::errors::ReorderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary key of a category row. Signed to match PostgreSQL integer columns.
pub type CategoryKey = i64;

/// Phase of the renumbering transaction.
///
/// Transitions are strictly linear; skipping or repeating a phase is a bug in
/// the caller and is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenumberPhase {
    /// All rows still at their original keys
    Unstaged,
    /// All rows moved to disjoint staging keys
    Staged,
    /// All rows at their desired keys
    Committed,
    /// Key generator advanced past the maximum key
    Resequenced,
}

impl RenumberPhase {
    /// The only phase reachable from `self`.
    pub fn next(self) -> Option<RenumberPhase> {
        match self {
            RenumberPhase::Unstaged => Some(RenumberPhase::Staged),
            RenumberPhase::Staged => Some(RenumberPhase::Committed),
            RenumberPhase::Committed => Some(RenumberPhase::Resequenced),
            RenumberPhase::Resequenced => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RenumberPhase::Unstaged => "unstaged",
            RenumberPhase::Staged => "staged",
            RenumberPhase::Committed => "committed",
            RenumberPhase::Resequenced => "resequenced",
        }
    }
}

impl fmt::Display for RenumberPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the live key range the staging keys occupy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingSide {
    /// Above every current and desired key
    #[default]
    Above,
    /// Below every current and desired key; used when the range above would
    /// leave the key column
    Below,
}

impl StagingSide {
    pub fn as_str(self) -> &'static str {
        match self {
            StagingSide::Above => "above",
            StagingSide::Below => "below",
        }
    }
}

impl fmt::Display for StagingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current phase and enforces linear transitions.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: RenumberPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: RenumberPhase::Unstaged,
        }
    }

    pub fn current(&self) -> RenumberPhase {
        self.current
    }

    /// Move to `to`, which must be the immediate successor of the current phase.
    pub fn advance(&mut self, to: RenumberPhase) -> Result<(), ReorderError> {
        if self.current.next() != Some(to) {
            return Err(ReorderError::InvalidPhaseTransition {
                from: self.current,
                to,
            });
        }
        self.current = to;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Transaction isolation requested from the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Minimum level: readers never see uncommitted (staged) keys
    ReadCommitted,
    RepeatableRead,
    #[default]
    Serializable,
}

impl IsolationLevel {
    /// SQL spelling used in `SET TRANSACTION ISOLATION LEVEL ...`.
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl FromStr for IsolationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "read_committed" => Ok(IsolationLevel::ReadCommitted),
            "repeatable_read" => Ok(IsolationLevel::RepeatableRead),
            "serializable" => Ok(IsolationLevel::Serializable),
            other => Err(format!("unknown isolation level: {other}")),
        }
    }
}

/// Options applied when a transaction is opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub isolation: IsolationLevel,
    /// Per-statement timeout inside the transaction (`SET LOCAL statement_timeout`)
    pub statement_timeout_ms: Option<u64>,
}
