//! Binary entrypoint for the tutoring HTTP API.
//!
//! Loads `.env` if present, then reads the configuration from the environment
//! (see [`tutor_server::config`]).

use tutor_server::config::ServerConfig;
use tutor_server::router::{build_router, cors_layer};
use tutor_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tutor_server::init_tracing();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    let state = AppState::new(&config).expect("Failed to initialize application state");
    let app = build_router(state, cors_layer(&config.cors_origins));

    let addr = config.api_addr();
    tracing::info!("tutor server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
