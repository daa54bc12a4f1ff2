//! Logging configuration.

use super::parse::env_or;
use super::ConfigError;

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    /// Service name for structured logging.
    pub service_name: String,
    /// Emit one JSON object per line instead of human-readable output (LOG_JSON).
    pub json: bool,
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: tokio_mvc=debug,hyper=warn
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            filter: Self::resolve_log_filter(),
            service_name: env_or("SERVICE_NAME", "tokio_mvc"),
            json: super::parse::env_bool("LOG_JSON", false),
        })
    }

    fn resolve_log_filter() -> String {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            let level = level.to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {
                    return format!("tokio_mvc={}", level);
                }
                _ => {
                    eprintln!(
                        "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                        level
                    );
                }
            }
        }

        if let Ok(filter) = std::env::var("RUST_LOG") {
            return filter;
        }

        "tokio_mvc=info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tokio_mvc=info".to_string(),
            service_name: "tokio_mvc".to_string(),
            json: false,
        }
    }
}
