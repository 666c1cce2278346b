//! Domain invariants for Category Reorder
//!
//! Checked by the service at every phase boundary, inside the transaction.

use super::entities::{Category, RenumberPlan};
use super::value_objects::{CategoryKey, RenumberPhase, StagingSide};
use std::collections::{HashMap, HashSet};

/// INVARIANT-1: Unique Keys
/// No two rows share a key.
pub fn invariant_unique_keys(rows: &[Category]) -> bool {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().all(|row| seen.insert(row.key))
}

/// INVARIANT-2: Disjoint Staging
/// Staging keys are distinct and lie beyond every current and desired key,
/// above or below according to the plan's staging side.
pub fn invariant_staging_disjoint(plan: &RenumberPlan) -> bool {
    let mut seen = HashSet::with_capacity(plan.assignments.len());

    match plan.staging_side {
        StagingSide::Above => {
            let ceiling = plan.current_max.max(plan.desired_max);
            plan.assignments.iter().all(|a| {
                a.staging_key > ceiling
                    && a.staging_key > plan.staging_base
                    && seen.insert(a.staging_key)
            })
        }
        StagingSide::Below => {
            let floor = plan
                .assignments
                .iter()
                .map(|a| a.current_key.min(a.final_key))
                .min()
                .unwrap_or(0);
            plan.assignments.iter().all(|a| {
                a.staging_key < floor
                    && a.staging_key < plan.staging_base
                    && seen.insert(a.staging_key)
            })
        }
    }
}

/// INVARIANT-3: Exact Match
/// At a phase boundary every planned row sits at the key that phase assigns it,
/// and no other rows exist.
pub fn invariant_rows_at(
    phase: RenumberPhase,
    plan: &RenumberPlan,
    rows: &[Category],
) -> Result<(), String> {
    if rows.len() != plan.assignments.len() {
        return Err(format!(
            "expected {} rows, found {}",
            plan.assignments.len(),
            rows.len()
        ));
    }

    let by_name: HashMap<&str, CategoryKey> =
        rows.iter().map(|r| (r.name.as_str(), r.key)).collect();

    for a in &plan.assignments {
        let expected = match phase {
            RenumberPhase::Unstaged => a.current_key,
            RenumberPhase::Staged => a.staging_key,
            RenumberPhase::Committed | RenumberPhase::Resequenced => a.final_key,
        };
        match by_name.get(a.name.as_str()) {
            Some(&actual) if actual == expected => {}
            Some(&actual) => {
                return Err(format!("{} at key {actual}, expected {expected}", a.name));
            }
            None => return Err(format!("{} missing", a.name)),
        }
    }

    if !invariant_unique_keys(rows) {
        return Err("duplicate keys present".to_string());
    }

    Ok(())
}

/// INVARIANT-4: Sequence Ahead
/// The generator's next value exceeds every assigned key.
pub fn invariant_sequence_ahead(next_value: CategoryKey, rows: &[Category]) -> bool {
    rows.iter().all(|row| next_value > row.key)
}
