//! Resolve target names against the rows read inside the transaction.

use crate::domain::entities::{Category, TargetEntry, TargetOrder};
use crate::domain::errors::ReorderError;
use crate::domain::value_objects::CategoryKey;
use std::collections::HashMap;

/// Pair every target entry with the current key of its single matching row.
///
/// Names are compared exactly. A name with no row or with several rows fails
/// closed. Match failures are reported before a count mismatch so the operator
/// sees which name is wrong.
pub fn match_target<'a>(
    target: &'a TargetOrder,
    rows: &[Category],
) -> Result<Vec<(&'a TargetEntry, CategoryKey)>, ReorderError> {
    let mut by_name: HashMap<&str, Vec<CategoryKey>> = HashMap::with_capacity(rows.len());
    for row in rows {
        by_name.entry(row.name.as_str()).or_default().push(row.key);
    }

    let mut matched = Vec::with_capacity(target.len());
    for entry in target.entries() {
        match by_name.get(entry.name.as_str()).map(Vec::as_slice) {
            None | Some([]) => {
                return Err(ReorderError::UnmatchedName {
                    name: entry.name.clone(),
                })
            }
            Some([key]) => matched.push((entry, *key)),
            Some(keys) => {
                return Err(ReorderError::AmbiguousName {
                    name: entry.name.clone(),
                    matches: keys.len(),
                })
            }
        }
    }

    // Every target name matched one row; any remaining rows are not covered.
    if rows.len() != target.len() {
        return Err(ReorderError::CountMismatch {
            target: target.len(),
            existing: rows.len(),
        });
    }

    Ok(matched)
}
