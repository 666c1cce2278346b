//! Randomized renumbering properties through the full service.

#[cfg(test)]
mod tests {
    use pam_01_category_reorder::{
        Category, CategoryKey, CategoryReorderApi, CategoryReorderService,
        InMemoryCategoryStore, ReorderConfig, TargetOrder,
    };
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    /// Current keys, desired keys and a staging offset for `n` categories.
    fn table() -> impl Strategy<Value = (Vec<CategoryKey>, Vec<CategoryKey>, CategoryKey)> {
        (1usize..12).prop_flat_map(|n| {
            (
                prop::collection::hash_set(1i64..500, n),
                Just((1..=n as i64).collect::<Vec<_>>()).prop_shuffle(),
                0i64..50,
            )
                .prop_map(|(current, desired, offset)| (current.into_iter().collect(), desired, offset))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_reorder_reaches_target_without_collisions((current, desired, offset) in table()) {
            let rows: Vec<Category> = current
                .iter()
                .enumerate()
                .map(|(i, k)| Category::new(*k, format!("kategori-{i}")))
                .collect();
            let target = TargetOrder::from_pairs(
                desired.iter().enumerate().map(|(i, k)| (*k, format!("kategori-{i}"))),
            )
            .unwrap();

            let store = InMemoryCategoryStore::with_categories(rows).unwrap();
            store.record_history(true);
            let config = ReorderConfig { staging_offset: offset, ..ReorderConfig::default() };
            let service = CategoryReorderService::with_config(store.clone(), config);

            let report = block_on(service.reorder(&target)).unwrap();

            for state in store.history() {
                let keys: HashSet<CategoryKey> = state.iter().map(|c| c.key).collect();
                prop_assert_eq!(keys.len(), state.len());
            }
            let expected: Vec<Category> = target
                .sorted_by_key()
                .into_iter()
                .map(|e| Category::new(e.key, e.name.clone()))
                .collect();
            prop_assert_eq!(store.snapshot(), expected);
            prop_assert!(report.next_key > desired.len() as i64);

            // Second run leaves the table as it is
            block_on(service.reorder(&target)).unwrap();
            let expected_again: Vec<Category> = target
                .sorted_by_key()
                .into_iter()
                .map(|e| Category::new(e.key, e.name.clone()))
                .collect();
            prop_assert_eq!(store.snapshot(), expected_again);
        }
    }
}
