//! Configuration for Category Reorder Subsystem

use crate::domain::entities::{TargetEntry, TargetOrder};
use crate::domain::errors::ReorderError;
use crate::domain::value_objects::{CategoryKey, IsolationLevel, TransactionOptions};
use serde::{Deserialize, Serialize};
use shared_types::SqlIdentifier;

/// Display order of the platform's categories, keys 1..10.
const DEFAULT_CATEGORY_NAMES: [&str; 10] = [
    "Fasilitas Kampus",
    "Akademik",
    "Kesejahteraan Mahasiswa",
    "Kegiatan Kemahasiswaan",
    "Sarana dan Prasarana Digital",
    "Keamanan dan Ketertiban",
    "Lingkungan dan Kebersihan",
    "Transportasi dan Akses",
    "Kebijakan dan Administrasi",
    "Saran dan Inovasi",
];

/// The built-in target order used when no order file is given.
pub fn default_category_order() -> TargetOrder {
    TargetOrder::from_trusted(
        DEFAULT_CATEGORY_NAMES
            .iter()
            .zip(1..)
            .map(|(name, key)| TargetEntry::new(key, *name))
            .collect(),
    )
}

/// Where the categories live
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTableConfig {
    pub table: SqlIdentifier,
    /// Unique integer key backed by a serial sequence
    pub key_column: SqlIdentifier,
    /// Unique name column used for matching
    pub name_column: SqlIdentifier,
}

impl Default for CategoryTableConfig {
    fn default() -> Self {
        Self {
            table: SqlIdentifier::from_static("kategori"),
            key_column: SqlIdentifier::from_static("id"),
            name_column: SqlIdentifier::from_static("nama"),
        }
    }
}

/// Reorder configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    pub table: CategoryTableConfig,
    /// Gap between `max(current, desired)` and the first staging key
    pub staging_offset: CategoryKey,
    /// Largest key the column can hold (`integer` by default)
    pub max_key: CategoryKey,
    pub isolation: IsolationLevel,
    /// Take `SHARE ROW EXCLUSIVE` on the table for the whole run
    pub lock_table: bool,
    /// `statement_timeout` applied with `SET LOCAL`
    pub statement_timeout_ms: Option<u64>,
    /// Re-read the table at every phase boundary inside the transaction
    pub check_phase_boundaries: bool,
    /// Re-read the table after commit and report disagreements
    pub verify_after_commit: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            table: CategoryTableConfig::default(),
            staging_offset: 100,
            max_key: CategoryKey::from(i32::MAX),
            isolation: IsolationLevel::Serializable,
            lock_table: true,
            statement_timeout_ms: None,
            check_phase_boundaries: true,
            verify_after_commit: true,
        }
    }
}

impl ReorderConfig {
    pub fn validate(&self) -> Result<(), ReorderError> {
        if self.staging_offset < 0 {
            return Err(ReorderError::InvalidConfig(format!(
                "staging_offset must not be negative, got {}",
                self.staging_offset
            )));
        }
        if self.max_key <= 0 {
            return Err(ReorderError::InvalidConfig(format!(
                "max_key must be positive, got {}",
                self.max_key
            )));
        }
        if self.statement_timeout_ms == Some(0) {
            return Err(ReorderError::InvalidConfig(
                "statement_timeout_ms of 0 disables the timeout; leave it unset instead".into(),
            ));
        }
        Ok(())
    }

    pub fn transaction_options(&self) -> TransactionOptions {
        TransactionOptions {
            isolation: self.isolation,
            statement_timeout_ms: self.statement_timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReorderConfig::default();
        assert_eq!(config.staging_offset, 100);
        assert_eq!(config.max_key, 2_147_483_647);
        assert_eq!(config.isolation, IsolationLevel::Serializable);
        assert!(config.lock_table);
        assert!(config.verify_after_commit);
        assert_eq!(config.table.table.as_str(), "kategori");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_offset() {
        let config = ReorderConfig {
            staging_offset: -1,
            ..ReorderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ReorderError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_order() {
        let order = default_category_order();
        assert_eq!(order.len(), 10);
        assert_eq!(order.key_for("Fasilitas Kampus"), Some(1));
        assert_eq!(order.key_for("Saran dan Inovasi"), Some(10));
        assert_eq!(order.max_key(), 10);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: ReorderConfig =
            serde_json::from_str(r#"{"staging_offset": 1000, "isolation": "read_committed"}"#)
                .unwrap();
        assert_eq!(config.staging_offset, 1000);
        assert_eq!(config.isolation, IsolationLevel::ReadCommitted);
        assert!(config.lock_table);
    }
}
