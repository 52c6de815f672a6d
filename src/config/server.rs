//! Server behavior configuration.

use serde::{Deserialize, Serialize};

use super::defaults::{
    default_cors_origins, default_max_connections_per_ip, default_max_message_size,
};

/// Connection-level server settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Maximum concurrent connections accepted from a single IP address
    #[serde(default = "default_max_connections_per_ip")]
    pub max_connections_per_ip: usize,
    /// Maximum inbound text frame size in bytes; larger frames are dropped
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Comma-separated allowed CORS origins, or "*" for permissive
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections_per_ip: default_max_connections_per_ip(),
            max_message_size: default_max_message_size(),
            cors_origins: default_cors_origins(),
        }
    }
}
