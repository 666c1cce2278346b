//! Target order loading

use anyhow::{Context, Result};
use pam_01_category_reorder::{default_category_order, TargetOrder};
use std::path::Path;

/// Read a target order from a JSON file, or fall back to the built-in order.
pub fn load_target_order(path: Option<&Path>) -> Result<TargetOrder> {
    let Some(path) = path else {
        return Ok(default_category_order());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read order file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid order file {}", path.display()))
}
