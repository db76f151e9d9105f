//! Conversation handlers: agent answers, demo answers, text processing.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use tutor_core::demo::demo_response;
use tutor_core::Block;

use super::run_blocking;
use crate::error::ApiError;
use crate::extract::{session_id, ApiJson};
use crate::schema::tutor::{BodyRequest, DemoRequest, ProcessRequest, ProcessResponse};
use crate::state::AppState;

/// `POST /api/body`
///
/// Records the block in the caller's conversation and asks the agent for the
/// next block. Any agent failure falls back to a demo answer for `text`.
pub async fn body(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<BodyRequest>,
) -> Result<Json<Block>, ApiError> {
    let session = session_id(&headers);
    let text = req.text.clone();
    let blocks = state
        .sessions
        .record_block(&session, req.id, Block::new(req.balise, req.text));
    let profile = state.sessions.profile(&session);

    match state.agent.respond(&blocks, profile.as_ref()).await {
        Ok(block) => {
            tracing::debug!(session = %session, balise = %block.balise, "agent answered");
            Ok(Json(block))
        }
        Err(err) => {
            tracing::warn!(session = %session, error = %err, "agent failed, serving demo response");
            demo_block(&state, text).await.map(Json)
        }
    }
}

/// `POST /api/demo`
pub async fn demo(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DemoRequest>,
) -> Result<Json<Block>, ApiError> {
    demo_block(&state, req.text).await.map(Json)
}

/// `POST /api/process`
pub async fn process(ApiJson(req): ApiJson<ProcessRequest>) -> Json<ProcessResponse> {
    Json(ProcessResponse {
        processed_text: req.text.to_uppercase(),
    })
}

async fn demo_block(state: &AppState, text: String) -> Result<Block, ApiError> {
    let mut rng = state.fork_rng().await;
    let block = run_blocking(move || demo_response(&text, &mut rng)).await??;
    Ok(block)
}
