//! Onboarding questionnaire: the static catalog offered to new learners and
//! the learner profile built from their answers.

use serde::{Deserialize, Serialize};

/// An education level option.
#[derive(Debug, Clone, Serialize)]
pub struct EducationLevel {
    pub index: u32,
    pub item: &'static str,
}

/// A subject with the topics a learner can pick from.
#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub topics: Vec<&'static str>,
}

/// Everything the questionnaire offers.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub education_levels: Vec<EducationLevel>,
    pub subjects: Vec<Subject>,
}

const EDUCATION_LEVELS: [&str; 6] = [
    "Middle school",
    "High school",
    "Bachelor's degree",
    "Master's degree",
    "Doctorate",
    "Lifelong learner",
];

/// Builds the questionnaire catalog.
pub fn catalog() -> Catalog {
    let education_levels = EDUCATION_LEVELS
        .into_iter()
        .enumerate()
        .map(|(index, item)| EducationLevel {
            index: index as u32,
            item,
        })
        .collect();

    let subjects = vec![
        Subject {
            id: "maths",
            name: "Mathematics",
            topics: vec![
                "Arithmetic",
                "Algebra",
                "Linear equations",
                "Polynomials",
                "Geometry",
                "Pythagorean theorem",
                "Functions",
                "Derivatives",
                "Integrals",
            ],
        },
        Subject {
            id: "physics",
            name: "Physics",
            topics: vec![
                "Kinematics",
                "Newton's laws",
                "Thermodynamics",
                "Ideal gases",
                "Electric current",
                "Ohm's law",
                "Magnetism",
            ],
        },
        Subject {
            id: "computer_science",
            name: "Computer Science",
            topics: vec![
                "Variables",
                "Control structures",
                "Loops",
                "Sorting and searching",
                "Algorithmic complexity",
                "Linked lists",
                "Binary trees",
            ],
        },
        Subject {
            id: "chemistry",
            name: "Chemistry",
            topics: vec![
                "Periodic table",
                "Chemical reactions",
                "Stoichiometry",
                "Hydrocarbons",
                "Nomenclature",
                "Thermochemistry",
                "Reaction rate",
            ],
        },
    ];

    Catalog {
        education_levels,
        subjects,
    }
}

// ---------------------------------------------------------------------------
// Learner answers
// ---------------------------------------------------------------------------

/// The education level a learner picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationLevelChoice {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub index: Option<u32>,
}

impl EducationLevelChoice {
    pub fn is_empty(&self) -> bool {
        self.item.is_empty() && self.index.is_none()
    }
}

/// A subject a learner picked, with the topics chosen inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectChoice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Questionnaire answers as posted by the frontend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub education_level: Option<EducationLevelChoice>,
    #[serde(default)]
    pub selected_subjects: Vec<SubjectChoice>,
    #[serde(default)]
    pub selected_topics: Vec<String>,
    #[serde(default)]
    pub timestamp: String,
}

/// Kind of a [`FixedQuestion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    EducationLevel,
    Subjects,
    Topics,
    Name,
}

/// A question the learner answered during onboarding, phrased for the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedQuestion {
    pub question: String,
    pub answer: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

impl LearnerProfile {
    /// Turns the answered parts of the profile into agent context.
    ///
    /// Order: education level, subjects, topics, name. Unanswered parts are
    /// skipped.
    pub fn fixed_questions(&self) -> Vec<FixedQuestion> {
        let mut questions = Vec::new();

        if let Some(level) = self.education_level.as_ref().filter(|l| !l.is_empty()) {
            let index = level.index.map(|i| i.to_string()).unwrap_or_default();
            questions.push(FixedQuestion {
                question: "What is your education level?".to_string(),
                answer: format!("{} (index: {})", level.item, index),
                kind: QuestionKind::EducationLevel,
            });
        }

        if !self.selected_subjects.is_empty() {
            let answer = self
                .selected_subjects
                .iter()
                .map(|s| format!("{} (topics: {})", s.name, s.topics.join(", ")))
                .collect::<Vec<_>>()
                .join(", ");
            questions.push(FixedQuestion {
                question: "What subjects are you interested in?".to_string(),
                answer,
                kind: QuestionKind::Subjects,
            });
        }

        if !self.selected_topics.is_empty() {
            questions.push(FixedQuestion {
                question: "What specific topics would you like to focus on?".to_string(),
                answer: self.selected_topics.join(", "),
                kind: QuestionKind::Topics,
            });
        }

        if !self.name.is_empty() {
            questions.push(FixedQuestion {
                question: "What is your name?".to_string(),
                answer: self.name.clone(),
                kind: QuestionKind::Name,
            });
        }

        questions
    }
}
