//! Renumber planner
//!
//! Turns a validated target order and the rows read inside the transaction
//! into a [`RenumberPlan`]. Pure: no I/O, so the dry run and the real run
//! compute identical plans from identical input.

use super::matching::match_target;
use super::staging::{staging_base, staging_floor, staging_keys, staging_keys_below};
use crate::domain::entities::{Category, RenumberPlan, StagedAssignment, TargetOrder};
use crate::domain::errors::ReorderError;
use crate::domain::value_objects::{CategoryKey, StagingSide};

/// Build the plan for one run.
///
/// Assignments follow target order; staging keys are `staging_base + 1 ..`
/// in the same order. If those would pass `max_key`, the keys are taken from
/// below the lowest current or desired key instead, down to `-max_key`. When
/// neither side fits, the upward `StagingOverflow` is returned.
pub fn build_plan(
    target: &TargetOrder,
    rows: &[Category],
    staging_offset: CategoryKey,
    max_key: CategoryKey,
) -> Result<RenumberPlan, ReorderError> {
    let matched = match_target(target, rows)?;

    let current_max = rows.iter().map(|r| r.key).max().unwrap_or(0);
    let desired_max = target.max_key();
    let above = staging_base(current_max, desired_max, staging_offset)
        .and_then(|base| Ok((base, staging_keys(base, matched.len(), max_key)?)));

    let (staging_side, base, staging) = match above {
        Ok((base, keys)) => (StagingSide::Above, base, keys),
        Err(overflow) => {
            let current_min = rows.iter().map(|r| r.key).min().unwrap_or(0);
            let desired_min = target.entries().iter().map(|e| e.key).min().unwrap_or(0);
            let below = staging_floor(current_min, desired_min, staging_offset).and_then(|floor| {
                staging_keys_below(floor, matched.len(), max_key.saturating_neg())
                    .map(|keys| (floor, keys))
            });
            match below {
                Some((floor, keys)) => (StagingSide::Below, floor, keys),
                None => return Err(overflow),
            }
        }
    };

    let assignments = matched
        .into_iter()
        .zip(staging)
        .map(|((entry, current_key), staging_key)| StagedAssignment {
            name: entry.name.clone(),
            current_key,
            staging_key,
            final_key: entry.key,
        })
        .collect();

    Ok(RenumberPlan {
        assignments,
        staging_base: base,
        staging_side,
        current_max,
        desired_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariants::invariant_staging_disjoint;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    const MAX_KEY: CategoryKey = i32::MAX as CategoryKey;

    fn rows(pairs: &[(CategoryKey, &str)]) -> Vec<Category> {
        pairs.iter().map(|(k, n)| Category::new(*k, *n)).collect()
    }

    /// Apply the plan one statement at a time, failing on the first duplicate.
    fn simulate(
        plan: &RenumberPlan,
        start: &[Category],
    ) -> Result<BTreeMap<CategoryKey, String>, String> {
        let mut table: BTreeMap<CategoryKey, String> =
            start.iter().map(|c| (c.key, c.name.clone())).collect();

        let phases: [fn(&StagedAssignment) -> (CategoryKey, CategoryKey); 2] = [
            |a| (a.current_key, a.staging_key),
            |a| (a.staging_key, a.final_key),
        ];
        for moves in phases {
            for a in &plan.assignments {
                let (from, to) = moves(a);
                let name = table
                    .remove(&from)
                    .ok_or_else(|| format!("{} not at {from}", a.name))?;
                if table.contains_key(&to) {
                    return Err(format!("moving {name} to {to} collides"));
                }
                table.insert(to, name);
            }
        }

        Ok(table)
    }

    #[test]
    fn test_order_preservation_plan() {
        let target = TargetOrder::from_pairs([(1, "A"), (2, "B"), (3, "C")]).unwrap();
        let current = rows(&[(2, "B"), (5, "A"), (9, "C")]);

        let plan = build_plan(&target, &current, 100, MAX_KEY).unwrap();

        assert_eq!(plan.current_max, 9);
        assert_eq!(plan.desired_max, 3);
        assert_eq!(plan.staging_base, 109);
        let staging: Vec<_> = plan.assignments.iter().map(|a| a.staging_key).collect();
        assert_eq!(staging, vec![110, 111, 112]);
        assert_eq!(plan.expected_next_key(), 4);
    }

    #[test]
    fn test_swap_plan_never_collides() {
        let target = TargetOrder::from_pairs([(2, "A"), (1, "B")]).unwrap();
        let current = rows(&[(1, "A"), (2, "B")]);

        let plan = build_plan(&target, &current, 100, MAX_KEY).unwrap();
        let table = simulate(&plan, &current).unwrap();

        assert_eq!(table.get(&2).map(String::as_str), Some("A"));
        assert_eq!(table.get(&1).map(String::as_str), Some("B"));
    }

    #[test]
    fn test_zero_offset_still_disjoint() {
        let target = TargetOrder::from_pairs([(1, "A"), (2, "B")]).unwrap();
        let current = rows(&[(2, "A"), (1, "B")]);

        let plan = build_plan(&target, &current, 0, MAX_KEY).unwrap();
        assert!(invariant_staging_disjoint(&plan));
        assert!(simulate(&plan, &current).is_ok());
    }

    #[test]
    fn test_identity_plan_is_noop() {
        let target = TargetOrder::from_pairs([(1, "A"), (2, "B")]).unwrap();
        let current = rows(&[(1, "A"), (2, "B")]);

        assert!(build_plan(&target, &current, 100, MAX_KEY).unwrap().is_noop());
    }

    #[test]
    fn test_match_errors_before_count() {
        let target = TargetOrder::from_pairs([(1, "A"), (2, "Missing")]).unwrap();
        let current = rows(&[(1, "A"), (2, "B"), (3, "C")]);

        assert!(matches!(
            build_plan(&target, &current, 100, MAX_KEY),
            Err(ReorderError::UnmatchedName { .. })
        ));
    }

    #[test]
    fn test_keys_near_column_maximum_stage_below() {
        let target = TargetOrder::from_pairs([(1, "A"), (2, "B")]).unwrap();
        let current = rows(&[(2_147_483_600, "A"), (1, "B")]);

        let plan = build_plan(&target, &current, 100, MAX_KEY).unwrap();

        assert_eq!(plan.staging_side, StagingSide::Below);
        assert_eq!(plan.staging_base, -99);
        let staging: Vec<_> = plan.assignments.iter().map(|a| a.staging_key).collect();
        assert_eq!(staging, vec![-101, -100]);
        assert!(invariant_staging_disjoint(&plan));

        let table = simulate(&plan, &current).unwrap();
        assert_eq!(table.get(&1).map(String::as_str), Some("A"));
        assert_eq!(table.get(&2).map(String::as_str), Some("B"));
    }

    #[test]
    fn test_staging_overflow_reported() {
        // A narrow key column leaves room on neither side
        let target = TargetOrder::from_pairs([(1, "A"), (2, "B")]).unwrap();
        let current = rows(&[(40, "A"), (50, "B")]);

        assert!(matches!(
            build_plan(&target, &current, 100, 50),
            Err(ReorderError::StagingOverflow { .. })
        ));
    }

    fn scenario() -> impl Strategy<Value = (Vec<CategoryKey>, Vec<CategoryKey>, CategoryKey)> {
        (1usize..16).prop_flat_map(|n| {
            (
                prop::collection::hash_set(1i64..10_000, n),
                prop::collection::hash_set(1i64..64, n),
                0i64..200,
            )
                .prop_map(|(current, desired, offset)| {
                    (current.into_iter().collect(), desired.into_iter().collect(), offset)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_every_statement_keeps_keys_unique((current, desired, offset) in scenario()) {
            let start: Vec<Category> = current
                .iter()
                .enumerate()
                .map(|(i, k)| Category::new(*k, format!("cat-{i}")))
                .collect();
            let target = TargetOrder::from_pairs(
                desired.iter().enumerate().map(|(i, k)| (*k, format!("cat-{i}"))),
            )
            .unwrap();

            let plan = build_plan(&target, &start, offset, MAX_KEY).unwrap();
            prop_assert!(invariant_staging_disjoint(&plan));

            let table = simulate(&plan, &start).map_err(TestCaseError::fail)?;
            for (i, key) in desired.iter().enumerate() {
                prop_assert_eq!(table.get(key), Some(&format!("cat-{i}")));
            }
            prop_assert_eq!(table.len(), start.len());
        }
    }
}
