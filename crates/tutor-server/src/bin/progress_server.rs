//! Binary entrypoint for the progress WebSocket server.

use std::sync::Arc;

use tutor_core::ProgressRules;
use tutor_server::config::ServerConfig;
use tutor_server::progress::ws::build_progress_router;
use tutor_server::progress::ProgressHub;
use tutor_server::router::cors_layer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tutor_server::init_tracing();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    let seed = config.rng_seed.unwrap_or_else(rand::random);
    let hub = Arc::new(ProgressHub::new(ProgressRules::default(), seed));
    let app = build_progress_router(hub, cors_layer(&config.cors_origins));

    let addr = config.progress_addr();
    tracing::info!("progress server starting on {} (WebSocket at /ws)", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
