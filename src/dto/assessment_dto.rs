use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::question::{AnswerPair, QuestionSpec};
use crate::models::report::Report;
use crate::utils::validation::{is_present, non_blank};

/// What to generate questions about. Either `level` alone, or the full
/// `role` + `subject` + `board` triple, must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_generation_target"))]
pub struct GenerationRequest {
    #[serde(default, alias = "standard")]
    pub level: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

fn validate_generation_target(req: &GenerationRequest) -> Result<(), ValidationError> {
    if is_present(&req.level)
        || (is_present(&req.role) && is_present(&req.subject) && is_present(&req.board))
    {
        return Ok(());
    }
    let mut err = ValidationError::new("generation_target");
    err.message = Some("Role, Subject, board and level are required.".into());
    Err(err)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[validate(custom(function = "non_blank", message = "Subject is required"))]
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
    #[serde(default)]
    pub user_answers: Vec<Option<String>>,
    #[validate(
        required(message = "User is not logged in. Cannot save report."),
        email(message = "Invalid email address")
    )]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "collageName")]
    pub college_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `POST /api/assessment`, discriminated by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssessmentRequest {
    GenerateQuestions(GenerationRequest),
    EvaluateAnswers(EvaluationRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestionsResponse {
    pub result: Vec<QuestionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub message: String,
    pub questions: Vec<QuestionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub result: String,
    pub score: usize,
    pub total: usize,
}

/// Body of `POST /api/report`: answers to compare, no scoring.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 1, message = "Answer data is required"))]
    #[serde(default)]
    pub data: Vec<AnswerPair>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub result: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsResponse {
    pub reports: Vec<Report>,
}
