//! Core entities for Category Reorder

use super::errors::ReorderError;
use super::value_objects::{CategoryKey, StagingSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A row of the category table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Primary key, also the display order
    pub key: CategoryKey,
    /// Unique human-readable name
    pub name: String,
}

impl Category {
    pub fn new(key: CategoryKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

/// One `(desired key, name)` pair of a target order.
///
/// Accepts both `{"key", "name"}` and the table's own `{"id", "nama"}` spelling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
    #[serde(alias = "id")]
    pub key: CategoryKey,
    #[serde(alias = "nama")]
    pub name: String,
}

impl TargetEntry {
    pub fn new(key: CategoryKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

/// A validated target order.
///
/// Non-empty, keys positive and pairwise distinct, names non-empty and
/// pairwise distinct. Matching against the table happens later, inside the
/// transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TargetEntry>", into = "Vec<TargetEntry>")]
pub struct TargetOrder {
    entries: Vec<TargetEntry>,
}

impl TargetOrder {
    pub fn new(entries: Vec<TargetEntry>) -> Result<Self, ReorderError> {
        if entries.is_empty() {
            return Err(ReorderError::EmptyTarget);
        }

        let mut keys = HashSet::with_capacity(entries.len());
        let mut names = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.key <= 0 {
                return Err(ReorderError::NonPositiveKey {
                    name: entry.name.clone(),
                    key: entry.key,
                });
            }
            if entry.name.trim().is_empty() {
                return Err(ReorderError::EmptyName { key: entry.key });
            }
            if !keys.insert(entry.key) {
                return Err(ReorderError::DuplicateKey { key: entry.key });
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ReorderError::DuplicateName {
                    name: entry.name.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Wrap entries known to be valid, such as a compiled-in literal.
    pub(crate) fn from_trusted(entries: Vec<TargetEntry>) -> Self {
        debug_assert!(Self::new(entries.clone()).is_ok(), "invalid built-in target order");
        Self { entries }
    }

    /// Build from `(key, name)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ReorderError>
    where
        I: IntoIterator<Item = (CategoryKey, S)>,
        S: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(key, name)| TargetEntry::new(key, name))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated order.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest desired key.
    pub fn max_key(&self) -> CategoryKey {
        self.entries.iter().map(|e| e.key).max().unwrap_or(0)
    }

    pub fn key_for(&self, name: &str) -> Option<CategoryKey> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.key)
    }

    /// Entries sorted by desired key.
    pub fn sorted_by_key(&self) -> Vec<&TargetEntry> {
        let mut sorted: Vec<&TargetEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.key);
        sorted
    }
}

impl TryFrom<Vec<TargetEntry>> for TargetOrder {
    type Error = ReorderError;

    fn try_from(entries: Vec<TargetEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<TargetOrder> for Vec<TargetEntry> {
    fn from(order: TargetOrder) -> Self {
        order.entries
    }
}

/// One row's journey through the three phases
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StagedAssignment {
    pub name: String,
    /// Key before the run
    pub current_key: CategoryKey,
    /// Temporary key held between Stage and Commit
    pub staging_key: CategoryKey,
    /// Desired key
    pub final_key: CategoryKey,
}

impl StagedAssignment {
    pub fn is_unchanged(&self) -> bool {
        self.current_key == self.final_key
    }
}

/// Full plan for one run, in target order
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenumberPlan {
    pub assignments: Vec<StagedAssignment>,
    /// Exclusive bound of the staging range, on `staging_side`
    pub staging_base: CategoryKey,
    pub staging_side: StagingSide,
    /// Largest key in the table when the plan was built
    pub current_max: CategoryKey,
    /// Largest desired key
    pub desired_max: CategoryKey,
}

impl RenumberPlan {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// True when every row already sits at its desired key.
    pub fn is_noop(&self) -> bool {
        self.assignments.iter().all(StagedAssignment::is_unchanged)
    }

    /// Final state, ordered by key
    pub fn final_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .assignments
            .iter()
            .map(|a| Category::new(a.final_key, a.name.clone()))
            .collect();
        categories.sort_by_key(|c| c.key);
        categories
    }

    /// Generator value expected after resequencing
    pub fn expected_next_key(&self) -> CategoryKey {
        self.desired_max + 1
    }
}

impl fmt::Display for RenumberPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Renumber plan for {} categories (current max {}, staging {} {})",
            self.assignments.len(),
            self.current_max,
            self.staging_side,
            self.staging_base
        )?;
        for a in &self.assignments {
            let marker = if a.is_unchanged() { " (unchanged)" } else { "" };
            writeln!(
                f,
                "  {:>4} -> {:>6} -> {:>4}  {}{}",
                a.current_key, a.staging_key, a.final_key, a.name, marker
            )?;
        }
        write!(f, "Next generated key after commit: {}", self.expected_next_key())
    }
}

/// Disagreement found by post-commit verification
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationIssue {
    /// Row exists but at a different key
    KeyMismatch {
        name: String,
        expected: CategoryKey,
        actual: CategoryKey,
    },
    /// Target name not found in the table
    MissingCategory { name: String },
    /// Row not mentioned in the target order
    UnexpectedCategory { name: String, key: CategoryKey },
    /// Two rows read back with the same key
    DuplicateKey { key: CategoryKey },
    /// Generator would hand out a key that is already taken
    SequenceBehind {
        next_value: CategoryKey,
        max_key: CategoryKey,
    },
    /// Verification could not be performed
    Unavailable { reason: String },
}

impl fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationIssue::KeyMismatch {
                name,
                expected,
                actual,
            } => write!(f, "{name} expected at key {expected} but found at {actual}"),
            VerificationIssue::MissingCategory { name } => write!(f, "{name} not found"),
            VerificationIssue::UnexpectedCategory { name, key } => {
                write!(f, "unexpected category {name} at key {key}")
            }
            VerificationIssue::DuplicateKey { key } => write!(f, "key {key} used more than once"),
            VerificationIssue::SequenceBehind { next_value, max_key } => write!(
                f,
                "key generator next value {next_value} does not exceed max key {max_key}"
            ),
            VerificationIssue::Unavailable { reason } => {
                write!(f, "verification unavailable: {reason}")
            }
        }
    }
}

/// Result of re-reading the table after commit
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Rows as read back, ordered by key
    pub categories: Vec<Category>,
    /// Generator's next value, when the store can report it
    pub next_key: Option<CategoryKey>,
    pub issues: Vec<VerificationIssue>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            categories: Vec::new(),
            next_key: None,
            issues: vec![VerificationIssue::Unavailable {
                reason: reason.into(),
            }],
        }
    }
}

/// Outcome of a successful run
#[derive(Clone, Debug, Serialize)]
pub struct ReorderReport {
    pub plan: RenumberPlan,
    /// Final table state, ordered by key
    pub final_categories: Vec<Category>,
    /// Generator's next value as set by the resequence phase
    pub next_key: CategoryKey,
    /// Present when post-commit verification ran
    pub verification: Option<VerificationReport>,
    pub completed_at: DateTime<Utc>,
}

impl ReorderReport {
    /// Verification issues; empty when verification was skipped or clean.
    pub fn warnings(&self) -> &[VerificationIssue] {
        self.verification
            .as_ref()
            .map(|v| v.issues.as_slice())
            .unwrap_or(&[])
    }
}

impl fmt::Display for ReorderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Category order:")?;
        for category in &self.final_categories {
            writeln!(f, "  {:>4}  {}", category.key, category.name)?;
        }
        writeln!(f, "Next generated key: {}", self.next_key)?;
        match &self.verification {
            None => write!(f, "Verification: skipped"),
            Some(v) if v.is_clean() => write!(f, "Verification: ok"),
            Some(v) => {
                write!(f, "Verification: {} warning(s)", v.issues.len())?;
                for issue in &v.issues {
                    write!(f, "\n  WARNING: {issue}")?;
                }
                Ok(())
            }
        }
    }
}
