//! Command implementations
//!
//! Each command takes the subsystem's inbound port so the same code runs
//! against PostgreSQL and the in-memory stores. The returned text is the
//! operator report.

use crate::config::RuntimeConfig;
use crate::RUNTIME_SUBSYSTEM;
use anyhow::{Context, Result};
use aspirasi_telemetry::log_event;
use pam_01_category_reorder::{
    Category, CategoryReorderApi, InMemoryCategoryStore, ReorderError, TargetOrder,
};
use pam_02_database_maintenance::{DatabaseCheckApi, TestUserFixture, TestUserSeedingApi};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Open the connection pool described by `config`.
pub async fn connect(config: &RuntimeConfig) -> Result<PgPool> {
    let url = config.require_database_url()?;
    log_event!(
        info,
        RUNTIME_SUBSYSTEM,
        "connecting to database",
        url = %url.masked(),
        max_connections = config.max_connections
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect(url.expose())
        .await
        .with_context(|| format!("Failed to connect to {}", url.masked()))
}

/// Table for `--in-memory` runs: the target's names in reverse order.
pub fn demo_store(target: &TargetOrder) -> Result<InMemoryCategoryStore> {
    let rows = target
        .entries()
        .iter()
        .rev()
        .enumerate()
        .map(|(i, entry)| Category::new(i as i64 + 1, entry.name.clone()));
    Ok(InMemoryCategoryStore::with_categories(rows)?)
}

pub async fn reorder_categories(
    api: &dyn CategoryReorderApi,
    target: &TargetOrder,
    dry_run: bool,
) -> Result<String> {
    if dry_run {
        let plan = api
            .plan(target)
            .await
            .map_err(|err| with_reorder_context(err, "Failed to plan category renumbering"))?;
        return Ok(format!("Dry run, nothing written.\n{plan}"));
    }

    let report = api
        .reorder(target)
        .await
        .map_err(|err| with_reorder_context(err, "Category renumbering failed"))?;
    Ok(report.to_string())
}

/// Operator input problems get their own message; the table was not changed.
fn with_reorder_context(err: ReorderError, context: &'static str) -> anyhow::Error {
    if err.is_input_error() {
        anyhow::Error::new(err)
            .context("Target order does not fit the category table, nothing was changed")
    } else {
        anyhow::Error::new(err).context(context)
    }
}

pub async fn check_database(api: &dyn DatabaseCheckApi) -> Result<String> {
    let summary = api.check().await.context("Database check failed")?;
    Ok(summary.to_string())
}

pub async fn seed_test_users(api: &dyn TestUserSeedingApi) -> Result<String> {
    let report = api
        .seed(&TestUserFixture::defaults())
        .await
        .context("Test user seeding failed")?;
    Ok(report.to_string())
}
