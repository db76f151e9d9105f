//! HTTP handler modules for the tutoring API.
//!
//! Handlers parse requests, delegate to `tutor_core` or the agent, and return
//! JSON. CPU-bound work (plot rendering) runs on the blocking pool through
//! [`run_blocking`].

pub mod health;
pub mod onboarding;
pub mod plot;
pub mod tutor;

use crate::error::ApiError;

/// Runs `f` on tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::InternalError(format!("task join error: {}", err)))
}
