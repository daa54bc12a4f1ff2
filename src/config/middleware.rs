//! Middleware configuration.

use std::path::PathBuf;

use super::parse::{env_bool, env_or};
use super::ConfigError;

/// Middleware configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct MiddlewareConfig {
    /// Access logging enabled (ACCESS_LOG).
    pub access_log: bool,
    /// Debugger enabled (DEBUG). Requests still opt in with `?_debug=1`.
    pub debug: bool,
    /// Writable data directory; debug records go to `{data_path}/debug`.
    pub data_path: PathBuf,
}

impl MiddlewareConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_log: env_bool("ACCESS_LOG", false),
            debug: env_bool("DEBUG", false),
            data_path: PathBuf::from(env_or("DATA_PATH", "data")),
        })
    }

    /// Directory the debugger writes its records to.
    pub fn debug_log_path(&self) -> PathBuf {
        self.data_path.join("debug")
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            access_log: false,
            debug: false,
            data_path: PathBuf::from("data"),
        }
    }
}
