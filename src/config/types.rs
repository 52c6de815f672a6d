//! Root configuration types.

use serde::{Deserialize, Serialize};

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

/// Root configuration struct for the Pong relay server.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
