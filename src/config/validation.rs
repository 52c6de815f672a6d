//! Configuration validation.

use thiserror::Error;

use super::Config;

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("server.max_connections_per_ip must be at least 1")]
    ZeroIpLimit,
    #[error("server.max_message_size must be at least {minimum} bytes (got {actual})")]
    MessageSizeTooSmall { minimum: usize, actual: usize },
    #[error("logging.rotation must be \"daily\", \"hourly\", or \"never\" (got {0:?})")]
    InvalidRotation(String),
    #[error("server.cors_origins contains no parseable origin: {0:?}")]
    InvalidCorsOrigins(String),
}

/// Smallest frame that still fits every gameplay message.
const MIN_MESSAGE_SIZE: usize = 256;

/// Check the loaded configuration for values the server cannot run with.
///
/// Used by `--validate-config` and at startup; [`super::load`] itself never
/// fails, so callers that need hard failure call this explicitly.
pub fn validate(config: &Config) -> Result<(), ConfigValidationError> {
    if config.server.max_connections_per_ip == 0 {
        return Err(ConfigValidationError::ZeroIpLimit);
    }

    if config.server.max_message_size < MIN_MESSAGE_SIZE {
        return Err(ConfigValidationError::MessageSizeTooSmall {
            minimum: MIN_MESSAGE_SIZE,
            actual: config.server.max_message_size,
        });
    }

    match config.logging.rotation.to_lowercase().as_str() {
        "daily" | "hourly" | "never" => {}
        other => return Err(ConfigValidationError::InvalidRotation(other.to_string())),
    }

    if config.server.cors_origins != "*" {
        let any_valid = config
            .server
            .cors_origins
            .split(',')
            .any(|s| s.trim().parse::<axum::http::HeaderValue>().is_ok());
        if !any_valid {
            return Err(ConfigValidationError::InvalidCorsOrigins(
                config.server.cors_origins.clone(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_zero_ip_limit() {
        let mut config = Config::default();
        config.server.max_connections_per_ip = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigValidationError::ZeroIpLimit)
        ));
    }

    #[test]
    fn rejects_tiny_message_size() {
        let mut config = Config::default();
        config.server.max_message_size = 16;
        assert!(matches!(
            validate(&config),
            Err(ConfigValidationError::MessageSizeTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_unknown_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigValidationError::InvalidRotation(_))
        ));
    }

    #[test]
    fn accepts_explicit_origin_list() {
        let mut config = Config::default();
        config.server.cors_origins = "https://example.com, https://play.example.com".to_string();
        assert!(validate(&config).is_ok());
    }
}
