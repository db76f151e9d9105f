//! HTTP/JSON and WebSocket server for the tutoring frontend.
//!
//! Two binaries share this crate: `tutor-server` serves the `/api/*` routes
//! (agent answers, demo answers, plots, onboarding) and `progress-server`
//! serves the gamified progress WebSocket. Both read [`config::ServerConfig`]
//! from the environment.

pub mod agent;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod llm_provider;
pub mod progress;
pub mod router;
pub mod schema;
pub mod sessions;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Installs the `tracing` subscriber (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
