//! Configuration module for the Pong relay server.
//!
//! Supports JSON configuration files, environment variable overrides, and
//! sensible compiled-in defaults.
//!
//! # Module Structure
//!
//! - [`types`]: Root `Config` struct
//! - [`server`]: Server behavior configuration (connection limits, CORS)
//! - [`logging`]: Logging configuration
//! - [`loader`]: Configuration loading functions
//! - [`validation`]: Configuration validation functions
//! - [`defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod server;
pub mod types;
pub mod validation;

pub use loader::load;

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use server::ServerConfig;

pub use types::Config;

pub use validation::validate;
