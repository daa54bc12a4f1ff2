//! Front controller server configuration.

use std::net::SocketAddr;

use super::parse::env_parse;
use super::ConfigError;

/// Server configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (LISTEN_ADDR).
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            listen_addr: env_parse("LISTEN_ADDR", default_listen_addr())?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
