//! Router assembly for the tutoring HTTP API.
//!
//! [`build_router`] wires the handlers to their routes with CORS and tracing
//! middleware layers. [`cors_layer`] is shared with the progress server.

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::extract::SESSION_HEADER;
use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // Conversation
        .route("/api/body", post(handlers::tutor::body))
        .route("/api/demo", post(handlers::tutor::demo))
        .route("/api/process", post(handlers::tutor::process))
        // Plots
        .route("/api/plot", post(handlers::plot::plot))
        // Onboarding
        .route("/api/init", post(handlers::onboarding::init))
        .route(
            "/api/questionnaire",
            get(handlers::onboarding::questionnaire)
                .post(handlers::onboarding::submit_questionnaire),
        )
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the given origins; an empty list allows any origin.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)])
}
