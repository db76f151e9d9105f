//! Schema types for learner onboarding (`/api/init`, `/api/questionnaire`).

use serde::{Deserialize, Serialize};
use tutor_core::catalog::{EducationLevelChoice, LearnerProfile, SubjectChoice};

/// Response for `POST /api/init`.
#[derive(Debug, Clone, Serialize)]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
    pub user_profile: LearnerProfile,
    pub agent_status: &'static str,
    pub fixed_questions_count: usize,
    pub ready_for_interaction: bool,
}

/// Request for `POST /api/questionnaire`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSubmission {
    #[serde(default)]
    pub education_level: Option<EducationLevelChoice>,
    #[serde(default)]
    pub selected_subjects: Vec<SubjectChoice>,
    #[serde(default)]
    pub selected_topics: Vec<String>,
}

/// The selection echoed back by `POST /api/questionnaire`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSelection {
    pub education_level: Option<EducationLevelChoice>,
    pub selected_subjects: Vec<SubjectChoice>,
    pub selected_topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireResponse {
    pub success: bool,
    pub selection: QuestionnaireSelection,
}
