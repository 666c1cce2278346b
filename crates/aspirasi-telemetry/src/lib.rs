//! # Aspirasi Telemetry
//!
//! Structured logging for the maintenance tooling.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aspirasi_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config)?;
//!     // Events are now written to stderr (pretty or JSON)
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PAM_SERVICE_NAME` | `aspirasi-maintenance` | Service name in events |
//! | `PAM_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `PAM_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `PAM_CONSOLE_OUTPUT` | `true` | Disable to silence all output |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_env_filter, TracingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let tracing_guard = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_service() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "aspirasi-maintenance");
    }

    #[test]
    fn test_error_display() {
        let err = TelemetryError::Config("bad".into());
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
