//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Subsystem identifier (01 = category reorder, 02 = database maintenance)
    pub subsystem_id: String,

    /// Log level filter (trace, debug, info, warn, error) or full EnvFilter directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Deployment environment (development, production)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "aspirasi-maintenance".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            environment: "development".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PAM_SERVICE_NAME`: Service name (default: aspirasi-maintenance)
    /// - `PAM_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `PAM_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `PAM_JSON_LOGS`: Enable JSON logs (default: true in production or
    ///   containers, false otherwise)
    /// - `NODE_ENV`: Deployment environment (default: development)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container = ["RAILWAY_ENVIRONMENT", "KUBERNETES_SERVICE_HOST", "DOCKER_CONTAINER"]
            .iter()
            .any(|key| lookup(key).is_some());

        let mut config = Self {
            service_name: lookup("PAM_SERVICE_NAME")
                .unwrap_or_else(|| "aspirasi-maintenance".to_string()),
            subsystem_id: "00".to_string(),
            log_level: lookup("PAM_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            console_output: lookup("PAM_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),
            json_logs: false,
            environment: lookup("NODE_ENV").unwrap_or_else(|| "development".to_string()),
        };

        let json_default = is_container || config.is_production();
        config.json_logs = lookup("PAM_JSON_LOGS")
            .map(|v| parse_flag(&v, json_default))
            .unwrap_or(json_default);
        config
    }

    /// Get the full service name including subsystem.
    pub fn full_service_name(&self) -> String {
        if self.subsystem_id == "00" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.subsystem_id)
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
