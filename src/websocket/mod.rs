//! WebSocket transport: axum routes, the upgrade handler, and per-socket
//! send/receive task plumbing.

mod connection;
mod handler;
mod routes;

pub use routes::{create_router, metrics_handler};
