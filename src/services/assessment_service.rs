use std::sync::Arc;

use crate::database::store::AssessmentStore;
use crate::dto::assessment_dto::{EvaluationRequest, GenerationRequest, ReviewRequest};
use crate::error::{Error, Result};
use crate::models::question::{QuestionSpec, ScoreResult};
use crate::models::report::{NewReport, Report, DEFAULT_COLLEGE_NAME, DEFAULT_ROLE};
use crate::services::extraction_service::ExtractionService;
use crate::services::model_client::{GenerationOptions, ModelClient};
use crate::services::prompt_service::{PromptService, ReportContext, ReviewContext};
use crate::services::report_service::ReportService;
use crate::services::scoring_service::ScoringService;
use crate::utils::validation::validate;

/// Result of scoring and narrating one submission. `save_error` is set when the
/// report could not be persisted; the score and text are still valid.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub result: String,
    pub score: ScoreResult,
    pub report: Option<Report>,
    pub save_error: Option<String>,
}

impl EvaluationOutcome {
    pub fn saved(&self) -> bool {
        self.save_error.is_none()
    }
}

const DEFAULT_REVIEW_SUBJECT: &str = "General";

#[derive(Clone)]
pub struct AssessmentService {
    model: Arc<dyn ModelClient>,
    store: Arc<dyn AssessmentStore>,
    prompts: Arc<PromptService>,
    reports: ReportService,
}

impl AssessmentService {
    pub fn new(
        model: Arc<dyn ModelClient>,
        store: Arc<dyn AssessmentStore>,
        prompts: Arc<PromptService>,
    ) -> Self {
        let reports = ReportService::new(model.clone(), prompts.clone());
        Self {
            model,
            store,
            prompts,
            reports,
        }
    }

    pub async fn generate_questions(&self, req: &GenerationRequest) -> Result<Vec<QuestionSpec>> {
        validate(req)?;

        let prompt = self.prompts.question_prompt(req);
        let raw = self.model.generate(&prompt, GenerationOptions::questions()).await?;
        let extraction = ExtractionService::extract_detailed(&raw)?;

        let expected = self.prompts.question_count();
        let off_contract = extraction
            .questions
            .iter()
            .filter(|q| !q.answer_is_an_option() || !q.has_expected_option_count())
            .count();
        if extraction.questions.len() != expected || off_contract > 0 {
            tracing::warn!(
                expected,
                received = extraction.questions.len(),
                off_contract,
                "Model output deviates from the requested question contract"
            );
        }
        tracing::info!(
            strategy = ?extraction.strategy,
            count = extraction.questions.len(),
            dropped = extraction.dropped,
            "Questions generated"
        );
        Ok(extraction.questions)
    }

    /// Scores the submission, asks the model for a report and stores it.
    /// Validation runs first so an incomplete request never reaches the model.
    pub async fn evaluate_answers(&self, req: &EvaluationRequest) -> Result<EvaluationOutcome> {
        validate(req)?;
        let email = req
            .email
            .clone()
            .ok_or_else(|| Error::Validation("User is not logged in. Cannot save report.".into()))?;

        let score = ScoringService::score(&req.questions, &req.user_answers);
        let role = non_blank_or(&req.role, DEFAULT_ROLE);
        let ctx = ReportContext {
            score,
            subject: req.subject.clone(),
            role: role.clone(),
            missed_questions: ScoringService::missed_questions(&req.questions, &req.user_answers),
        };
        let result = self.reports.generate_report(&ctx).await?;

        let new_report = NewReport {
            subject: req.subject.clone(),
            email: email.clone(),
            college_name: non_blank_or(&req.college_name, DEFAULT_COLLEGE_NAME),
            role,
            report_analysis_text: result.clone(),
            score: score.score as i32,
            total_questions: score.total as i32,
        };

        match self.store.insert_report(new_report).await {
            Ok(report) => {
                tracing::info!(email = %email, report_id = %report.id, "Report saved");
                Ok(EvaluationOutcome {
                    result,
                    score,
                    report: Some(report),
                    save_error: None,
                })
            }
            Err(e) => {
                tracing::error!(email = %email, error = ?e, "Database save error");
                Ok(EvaluationOutcome {
                    result,
                    score,
                    report: None,
                    save_error: Some(e.to_string()),
                })
            }
        }
    }

    /// Narrative comparison of submitted and original answers. Nothing is
    /// scored or stored.
    pub async fn review_answers(&self, req: &ReviewRequest) -> Result<String> {
        validate(req)?;
        let ctx = ReviewContext {
            subject: non_blank_or(&req.subject, DEFAULT_REVIEW_SUBJECT),
            role: non_blank_or(&req.role, DEFAULT_ROLE),
            answers: req.data.clone(),
        };
        self.reports.generate_review(&ctx).await
    }

    pub async fn fetch_reports(&self, email: Option<&str>) -> Result<Vec<Report>> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::Validation("Email query parameter required".into()))?;
        self.store.find_reports_by_email(email).await
    }
}

fn non_blank_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}
