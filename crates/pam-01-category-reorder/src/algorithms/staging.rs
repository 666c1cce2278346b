//! Staging range computation.
//!
//! The range is derived from the live maximum key, so it stays disjoint from
//! both the current and the desired key sets even when earlier inserts left
//! keys far above the row count. When that range would pass the key column's
//! maximum, the planner falls back to a range below the live minimum, bounded
//! by `-max_key`.

use crate::domain::errors::ReorderError;
use crate::domain::value_objects::CategoryKey;

/// Exclusive lower bound of the staging range.
///
/// `max(current_max, desired_max) + offset`.
pub fn staging_base(
    current_max: CategoryKey,
    desired_max: CategoryKey,
    offset: CategoryKey,
) -> Result<CategoryKey, ReorderError> {
    let ceiling = current_max.max(desired_max).max(0);
    ceiling
        .checked_add(offset.max(0))
        .ok_or(ReorderError::StagingOverflow {
            base: ceiling,
            count: 0,
            max_key: CategoryKey::MAX,
        })
}

/// `count` consecutive staging keys above `base`, all within `max_key`.
pub fn staging_keys(
    base: CategoryKey,
    count: usize,
    max_key: CategoryKey,
) -> Result<Vec<CategoryKey>, ReorderError> {
    let overflow = || ReorderError::StagingOverflow {
        base,
        count,
        max_key,
    };

    let count_key = CategoryKey::try_from(count).map_err(|_| overflow())?;
    let last = base.checked_add(count_key).ok_or_else(overflow)?;
    if last > max_key {
        return Err(overflow());
    }

    Ok((1..=count_key).map(|i| base + i).collect())
}

/// Exclusive upper bound of the fallback range.
///
/// `min(current_min, desired_min) - offset`, or `None` on overflow.
pub fn staging_floor(
    current_min: CategoryKey,
    desired_min: CategoryKey,
    offset: CategoryKey,
) -> Option<CategoryKey> {
    current_min.min(desired_min).checked_sub(offset.max(0))
}

/// `count` consecutive staging keys below `base`, none under `min_key`.
///
/// Ordered ascending, matching [`staging_keys`].
pub fn staging_keys_below(
    base: CategoryKey,
    count: usize,
    min_key: CategoryKey,
) -> Option<Vec<CategoryKey>> {
    let count_key = CategoryKey::try_from(count).ok()?;
    let first = base.checked_sub(count_key)?;
    if first < min_key {
        return None;
    }

    Some((first..base).collect())
}
