#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use pong_relay_server::config;
use pong_relay_server::logging;
use pong_relay_server::server::{RelayServer, ServerConfig};
use pong_relay_server::websocket;
use std::net::SocketAddr;

/// Pong Relay -- lightweight WebSocket matchmaking and relay server for two-player Pong
#[derive(Parser, Debug)]
#[command(name = "pong-relay-server")]
#[command(about = "A lightweight, in-memory WebSocket matchmaking and relay server")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines and pre-deployment checks.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    /// Useful for debugging configuration loading from multiple sources.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json if present; otherwise use code defaults.
    let cfg = config::load();

    // Handle --print-config: output the loaded configuration as JSON
    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate(&cfg);

    // Handle --validate-config: exit after validation
    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Max connections per IP: {}", cfg.server.max_connections_per_ip);
                println!("  Max message size: {} bytes", cfg.server.max_message_size);
                println!("  CORS origins: {}", cfg.server.cors_origins);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    // In normal operation, propagate validation errors
    validation_result?;

    // Initialize logging from config.
    logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));

    tracing::info!(%addr, "Starting Pong relay server");

    let server_config = ServerConfig {
        max_connections_per_ip: cfg.server.max_connections_per_ip,
        max_message_size: cfg.server.max_message_size,
    };

    let relay_server = RelayServer::new(server_config);

    let app = websocket::create_router(&cfg.server.cors_origins).with_state(relay_server);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();

    // Plain TCP; typically deployed behind a reverse proxy.
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        cors_origins = %cfg.server.cors_origins,
        "Server started - WebSocket: /ws, Health: /health, Metrics: /metrics"
    );

    axum::serve(listener, make_service).await?;

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn test_cli_default_no_flags() {
        let cli = Cli::try_parse_from(["pong-relay-server"]).unwrap();
        assert!(!cli.validate_config);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_cli_validate_config_short() {
        let cli = Cli::try_parse_from(["pong-relay-server", "-c"]).unwrap();
        assert!(cli.validate_config);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_cli_print_config() {
        let cli = Cli::try_parse_from(["pong-relay-server", "--print-config"]).unwrap();
        assert!(!cli.validate_config);
        assert!(cli.print_config);
    }

    #[test]
    fn test_cli_validate_and_print_config_conflict() {
        // --validate-config and --print-config are mutually exclusive
        let result =
            Cli::try_parse_from(["pong-relay-server", "--validate-config", "--print-config"]);
        assert!(result.is_err());
    }
}
