//! # Maintenance Runtime Library
//!
//! Exposes the runtime's configuration loading, command-line surface and
//! command implementations for testing. The entry point is `main.rs`.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments
//! 2. Initialize telemetry
//! 3. Load configuration from the environment, warning on unusable values
//! 4. Connect (unless `--in-memory`) and run the selected command
//! 5. Print the report to stdout; failures exit non-zero

pub mod cli;
pub mod commands;
pub mod config;
pub mod order;

pub use cli::{Cli, Command};
pub use config::{ConfigError, RuntimeConfig};
pub use order::load_target_order;

/// Subsystem label for runtime events.
pub const RUNTIME_SUBSYSTEM: &str = "runtime";
