#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Pong Relay Server
//!
//! A lightweight, in-memory WebSocket matchmaking and relay server for
//! two-player Pong.
//!
//! Clients connect anonymously, wait in a FIFO queue, and are paired into
//! sessions as soon as two are available. The earlier arrival becomes the
//! host (authoritative for ball physics); gameplay messages are relayed
//! verbatim to the session peer. No database, no accounts: just run the
//! binary and connect via WebSocket.

/// Server configuration and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// Metrics collection and reporting
pub mod metrics;

/// WebSocket message protocol definitions
pub mod protocol;

/// Main server orchestration
pub mod server;

/// WebSocket connection handling
pub mod websocket;
