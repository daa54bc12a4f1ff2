//! Application-level settings consumed by controllers.

use std::path::PathBuf;

use super::parse::{env_bool, env_opt, env_or};
use super::ConfigError;

/// Application configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Secret for secure cookies (APP_SECRET_KEY). Unset disables them.
    pub secret_key: Option<String>,
    /// Output charset (APP_CHARSET).
    pub charset: String,
    /// Base URL the app is mounted under (APP_BASE_URL).
    pub base_url: String,
    /// Action used when the route names none (DEFAULT_ACTION).
    pub default_action: String,
    /// Template used by `Controller::message` (MESSAGE_TEMPLATE).
    pub message_template: String,
    /// Allow JSONP wrapping in `serve_json` (JSONP_ENABLED).
    pub jsonp_enabled: bool,
    /// Request parameter carrying the JSONP callback (JSONP_CALLBACK).
    pub jsonp_callback: String,
    /// Template directory (VIEW_PATH).
    pub view_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let charset = env_or("APP_CHARSET", &defaults.charset);
        if charset.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "APP_CHARSET".into(),
                message: "must not be empty".into(),
            });
        }

        Ok(Self {
            secret_key: env_opt("APP_SECRET_KEY"),
            charset,
            base_url: env_or("APP_BASE_URL", ""),
            default_action: env_opt("DEFAULT_ACTION").unwrap_or(defaults.default_action),
            message_template: env_opt("MESSAGE_TEMPLATE").unwrap_or(defaults.message_template),
            jsonp_enabled: env_bool("JSONP_ENABLED", false),
            jsonp_callback: env_opt("JSONP_CALLBACK").unwrap_or(defaults.jsonp_callback),
            view_path: env_opt("VIEW_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.view_path),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            charset: "utf-8".to_string(),
            base_url: String::new(),
            default_action: "index".to_string(),
            message_template: "message".to_string(),
            jsonp_enabled: false,
            jsonp_callback: "jsoncallback".to_string(),
            view_path: PathBuf::from("views"),
        }
    }
}
