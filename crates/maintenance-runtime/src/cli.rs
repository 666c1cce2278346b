//! Command-line surface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Maintenance tasks for the Platform Aspirasi Mahasiswa database
#[derive(Parser, Debug)]
#[command(name = "pam-maintenance")]
#[command(about = "Renumber categories, check connectivity and seed test users")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Renumber category keys to match the display order
    ReorderCategories {
        /// JSON list of `{"key": .., "name": ..}` replacing the built-in order
        #[arg(long, value_name = "FILE")]
        order_file: Option<PathBuf>,

        /// Print the renumbering plan without writing
        #[arg(long)]
        dry_run: bool,

        /// Run against an in-memory table seeded with the categories in
        /// reverse order
        #[arg(long)]
        in_memory: bool,
    },

    /// Test the connection and summarize the account and content tables
    CheckDatabase {
        /// Create the initial test user when the user table is empty
        #[arg(long)]
        seed_if_empty: bool,
    },

    /// Create the test accounts the client test suite logs in with
    SeedTestUsers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reorder_flags() {
        let cli = Cli::try_parse_from([
            "pam-maintenance",
            "reorder-categories",
            "--order-file",
            "order.json",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::ReorderCategories {
                order_file: Some(PathBuf::from("order.json")),
                dry_run: true,
                in_memory: false,
            }
        );
    }

    #[test]
    fn test_parse_check_and_seed() {
        let cli = Cli::try_parse_from(["pam-maintenance", "check-database", "--seed-if-empty"]).unwrap();
        assert_eq!(cli.command, Command::CheckDatabase { seed_if_empty: true });

        let cli = Cli::try_parse_from(["pam-maintenance", "seed-test-users"]).unwrap();
        assert_eq!(cli.command, Command::SeedTestUsers);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["pam-maintenance", "drop-everything"]).is_err());
    }
}
