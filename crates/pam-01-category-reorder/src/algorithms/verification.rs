//! Post-commit verification
//!
//! Compares the rows read back after commit with the target order. Findings
//! are warnings: the write transaction has already committed.

use crate::domain::entities::{Category, TargetOrder, VerificationIssue, VerificationReport};
use crate::domain::value_objects::CategoryKey;
use std::collections::{HashMap, HashSet};

/// Check `rows` (ordered by key) and the generator's `next_value` against `target`.
pub fn verify_against_target(
    target: &TargetOrder,
    rows: Vec<Category>,
    next_value: Option<CategoryKey>,
) -> VerificationReport {
    let mut issues = Vec::new();

    let mut seen_keys = HashSet::with_capacity(rows.len());
    for row in &rows {
        if !seen_keys.insert(row.key) {
            issues.push(VerificationIssue::DuplicateKey { key: row.key });
        }
    }

    let by_name: HashMap<&str, CategoryKey> =
        rows.iter().map(|r| (r.name.as_str(), r.key)).collect();

    for entry in target.sorted_by_key() {
        match by_name.get(entry.name.as_str()) {
            Some(&actual) if actual == entry.key => {}
            Some(&actual) => issues.push(VerificationIssue::KeyMismatch {
                name: entry.name.clone(),
                expected: entry.key,
                actual,
            }),
            None => issues.push(VerificationIssue::MissingCategory {
                name: entry.name.clone(),
            }),
        }
    }

    for row in &rows {
        if target.key_for(&row.name).is_none() {
            issues.push(VerificationIssue::UnexpectedCategory {
                name: row.name.clone(),
                key: row.key,
            });
        }
    }

    if let (Some(next), Some(max_key)) = (next_value, rows.iter().map(|r| r.key).max()) {
        if next <= max_key {
            issues.push(VerificationIssue::SequenceBehind {
                next_value: next,
                max_key,
            });
        }
    }

    VerificationReport {
        categories: rows,
        next_key: next_value,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetOrder {
        TargetOrder::from_pairs([(1, "A"), (2, "B"), (3, "C")]).unwrap()
    }

    #[test]
    fn test_clean_report() {
        let rows = vec![Category::new(1, "A"), Category::new(2, "B"), Category::new(3, "C")];
        let report = verify_against_target(&target(), rows, Some(4));

        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.next_key, Some(4));
    }

    #[test]
    fn test_detects_mismatch_and_missing() {
        let rows = vec![Category::new(1, "B"), Category::new(2, "A"), Category::new(7, "Z")];
        let report = verify_against_target(&target(), rows, Some(8));

        assert!(report.issues.contains(&VerificationIssue::KeyMismatch {
            name: "A".into(),
            expected: 1,
            actual: 2
        }));
        assert!(report.issues.contains(&VerificationIssue::MissingCategory { name: "C".into() }));
        assert!(report
            .issues
            .contains(&VerificationIssue::UnexpectedCategory { name: "Z".into(), key: 7 }));
    }

    #[test]
    fn test_detects_sequence_behind() {
        let rows = vec![Category::new(1, "A"), Category::new(2, "B"), Category::new(3, "C")];
        let report = verify_against_target(&target(), rows, Some(3));

        assert_eq!(
            report.issues,
            vec![VerificationIssue::SequenceBehind {
                next_value: 3,
                max_key: 3
            }]
        );
    }

    #[test]
    fn test_unknown_sequence_is_not_an_issue() {
        let rows = vec![Category::new(1, "A"), Category::new(2, "B"), Category::new(3, "C")];
        assert!(verify_against_target(&target(), rows, None).is_clean());
    }
}
