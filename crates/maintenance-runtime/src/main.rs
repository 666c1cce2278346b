//! # Aspirasi Maintenance Runtime
//!
//! Entry point for `pam-maintenance`. See the library docs for the startup
//! sequence and `config` for the environment variables.

use anyhow::{Context, Result};
use aspirasi_telemetry::{init_telemetry, log_event, TelemetryConfig};
use clap::Parser;

use maintenance_runtime::commands::{self, connect, demo_store};
use maintenance_runtime::{load_target_order, Cli, Command, RuntimeConfig, RUNTIME_SUBSYSTEM};
use pam_01_category_reorder::{CategoryReorderService, PostgresCategoryStore};
use pam_02_database_maintenance::{
    CheckConfig, DatabaseCheckService, PostgresAccountStore, TestUserSeeder,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env();
    config.validate().context("Invalid configuration")?;

    let output = run(cli.command, &config).await?;
    println!("{output}");
    Ok(())
}

async fn run(command: Command, config: &RuntimeConfig) -> Result<String> {
    match command {
        Command::ReorderCategories {
            order_file,
            dry_run,
            in_memory,
        } => {
            let target = load_target_order(order_file.as_deref())?;
            log_event!(
                info,
                RUNTIME_SUBSYSTEM,
                "renumbering categories",
                categories = target.len(),
                dry_run = dry_run,
                in_memory = in_memory,
                isolation = config.isolation().as_sql()
            );

            if in_memory {
                let service =
                    CategoryReorderService::with_config(demo_store(&target)?, config.reorder.clone());
                return commands::reorder_categories(&service, &target, dry_run).await;
            }

            let pool = connect(config).await?;
            let store = PostgresCategoryStore::new(pool.clone(), &config.reorder.table);
            let service = CategoryReorderService::with_config(store, config.reorder.clone());
            let result = commands::reorder_categories(&service, &target, dry_run).await;
            pool.close().await;
            result
        }

        Command::CheckDatabase { seed_if_empty } => {
            let url = config.require_database_url()?;
            let check = CheckConfig {
                seed_if_empty,
                ..CheckConfig::default()
            };

            let pool = connect(config).await?;
            let store = PostgresAccountStore::new(pool.clone(), &config.schema);
            let mut service = DatabaseCheckService::with_config(store, url.masked(), check);
            if seed_if_empty {
                service = service.with_password_hash(config.password_hash()?);
            }
            let result = commands::check_database(&service).await;
            pool.close().await;
            result
        }

        Command::SeedTestUsers => {
            let hash = config.password_hash()?;
            let pool = connect(config).await?;
            let store = PostgresAccountStore::new(pool.clone(), &config.schema);
            let result = commands::seed_test_users(&TestUserSeeder::new(store, hash)).await;
            pool.close().await;
            result
        }
    }
}
