//! Configuration module for tokio_mvc.
//!
//! Configuration is loaded from environment variables into typed sections.
//! Controllers read it through the [`ConfigStore`] trait so tests and
//! embedders can substitute a [`MemoryConfig`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_mvc::config::{Config, ConfigStore};
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! let secret = config.get("app", "secret_key");
//! ```

mod app;
mod error;
mod logging;
mod middleware;
mod parse;
mod server;
mod store;

pub use app::AppConfig;
pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use middleware::MiddlewareConfig;
pub use parse::parse_bool;
pub use server::ServerConfig;
pub use store::{ConfigStore, MemoryConfig};

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Application settings.
    pub app: AppConfig,
    /// Server configuration.
    pub server: ServerConfig,
    /// Middleware configuration.
    pub middleware: MiddlewareConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppConfig::from_env()?,
            server: ServerConfig::from_env()?,
            middleware: MiddlewareConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Views: {:?}", self.app.view_path);
        info!("  Default action: {}", self.app.default_action);
        info!("  Charset: {}", self.app.charset);

        if self.app.secret_key.is_none() {
            info!("  Secret key: not set (secure cookies disabled)");
        }

        if self.app.jsonp_enabled {
            info!("  JSONP: enabled (callback param: {})", self.app.jsonp_callback);
        }

        if self.middleware.access_log {
            info!("  Access log: enabled");
        }

        if self.middleware.debug {
            info!("  Debugger: enabled ({:?})", self.middleware.debug_log_path());
        }
    }
}

impl ConfigStore for Config {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        let app = &self.app;
        match (section, key) {
            ("app", "secret_key") => app.secret_key.clone(),
            ("app", "charset") => Some(app.charset.clone()),
            ("app", "base_url") => Some(app.base_url.clone()),
            ("app", "default_action") => Some(app.default_action.clone()),
            ("app", "message_template") => Some(app.message_template.clone()),
            ("app", "jsonp_enabled") => Some(if app.jsonp_enabled { "1" } else { "0" }.to_string()),
            ("app", "jsonp_callback") => Some(app.jsonp_callback.clone()),
            ("app", "view_path") => Some(app.view_path.display().to_string()),
            ("server", "listen_addr") => Some(self.server.listen_addr.to_string()),
            ("middleware", "data_path") => Some(self.middleware.data_path.display().to_string()),
            _ => None,
        }
    }
}
