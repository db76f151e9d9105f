use axum::extract::State;
use axum::Json;

use crate::schema::tutor::HealthResponse;
use crate::state::AppState;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        agent_configured: state.agent.is_configured(),
    })
}
