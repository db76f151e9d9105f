//! Schema types for the conversation routes.

use serde::{Deserialize, Serialize};
use tutor_core::BlockId;

/// Request for `POST /api/body`.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyRequest {
    /// Position of the block in the conversation.
    pub id: BlockId,
    pub text: String,
    pub balise: String,
}

/// Request for `POST /api/demo`.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoRequest {
    pub text: String,
}

/// Request for `POST /api/process`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub processed_text: String,
}

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub agent_configured: bool,
}
