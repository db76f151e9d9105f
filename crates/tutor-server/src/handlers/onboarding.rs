//! Learner onboarding: questionnaire catalog and profile initialization.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use tutor_core::catalog::{catalog, Catalog, LearnerProfile};

use crate::error::ApiError;
use crate::extract::{session_id, ApiJson};
use crate::schema::onboarding::{
    InitResponse, QuestionnaireResponse, QuestionnaireSelection, QuestionnaireSubmission,
};
use crate::state::AppState;

/// Failure of `POST /api/init`: the standard error body plus
/// `agent_status: "error"`.
#[derive(Debug)]
pub struct InitError(pub ApiError);

impl IntoResponse for InitError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let body = json!({
            "success": false,
            "error": self.0.to_string(),
            "code": self.0.code(),
            "agent_status": "error",
        });
        (status, Json(body)).into_response()
    }
}

/// `POST /api/init`
///
/// Stores the questionnaire answers as the session's learner profile. The
/// agent sees them as fixed questions on every following `/api/body` call.
pub async fn init(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LearnerProfile>, JsonRejection>,
) -> Result<Json<InitResponse>, InitError> {
    let Json(profile) =
        payload.map_err(|rejection| InitError(ApiError::BadRequest(rejection.body_text())))?;
    let session = session_id(&headers);
    let fixed_questions_count = profile.fixed_questions().len();

    state.sessions.set_profile(&session, profile.clone());
    tracing::info!(
        session = %session,
        fixed_questions = fixed_questions_count,
        "learner profile initialized"
    );

    Ok(Json(InitResponse {
        success: true,
        message: "Agent initialized with learner profile".to_string(),
        user_profile: profile,
        agent_status: "initialized",
        fixed_questions_count,
        ready_for_interaction: true,
    }))
}

/// `GET /api/questionnaire`
pub async fn questionnaire() -> Json<Catalog> {
    Json(catalog())
}

/// `POST /api/questionnaire`
pub async fn submit_questionnaire(
    ApiJson(req): ApiJson<QuestionnaireSubmission>,
) -> Json<QuestionnaireResponse> {
    Json(QuestionnaireResponse {
        success: true,
        selection: QuestionnaireSelection {
            education_level: req.education_level,
            selected_subjects: req.selected_subjects,
            selected_topics: req.selected_topics,
        },
    })
}
