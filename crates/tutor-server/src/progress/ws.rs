//! HTTP and WebSocket routes of the progress server.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{ProgressHub, ProgressStats, ServerEvent};

/// Builds the progress server router: `GET /`, `GET /stats`, `GET /ws`.
pub fn build_progress_router(hub: Arc<ProgressHub>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/stats", get(stats))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(hub)
}

/// `GET /`
async fn status(State(hub): State<Arc<ProgressHub>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "Progress server running",
        "connected_users": hub.connected_users(),
        "endpoint": "/ws",
    }))
}

/// `GET /stats`
async fn stats(State(hub): State<Arc<ProgressHub>>) -> Json<ProgressStats> {
    Json(hub.stats())
}

/// `GET /ws`
async fn ws_handler(
    State(hub): State<Arc<ProgressHub>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, hub))
}

async fn run_session(mut socket: WebSocket, hub: Arc<ProgressHub>) {
    let (mut conn, greeting) = hub.connect();
    let id = conn.id();
    tracing::info!(connection = %id, users = hub.connected_users(), "client connected");

    if send_event(&mut socket, &greeting).await.is_ok() {
        while let Some(Ok(msg)) = socket.recv().await {
            match msg {
                Message::Text(text) => {
                    let reply = hub.handle_frame(&mut conn, text.as_str());
                    if send_event(&mut socket, &reply).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    }

    if let Some(summary) = hub.disconnect(conn) {
        tracing::info!(
            connection = %id,
            duration_secs = summary.duration.as_secs_f64(),
            progress = summary.progress,
            accuracy = summary.accuracy,
            "client disconnected"
        );
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}
