use std::sync::Arc;

use crate::error::Result;
use crate::services::model_client::{GenerationOptions, ModelClient};
use crate::services::prompt_service::{PromptService, ReportContext, ReviewContext};

/// Asks the model for a narrative evaluation. The reply is read by people, so
/// it is returned as-is with no structural parsing.
#[derive(Clone)]
pub struct ReportService {
    model: Arc<dyn ModelClient>,
    prompts: Arc<PromptService>,
}

impl ReportService {
    pub fn new(model: Arc<dyn ModelClient>, prompts: Arc<PromptService>) -> Self {
        Self { model, prompts }
    }

    pub async fn generate_report(&self, ctx: &ReportContext) -> Result<String> {
        let prompt = self.prompts.report_prompt(ctx);
        tracing::info!(
            subject = %ctx.subject,
            score = ctx.score.score,
            total = ctx.score.total,
            "Requesting evaluation report"
        );
        self.model.generate(&prompt, GenerationOptions::report()).await
    }

    pub async fn generate_review(&self, ctx: &ReviewContext) -> Result<String> {
        let prompt = self.prompts.review_prompt(ctx);
        tracing::info!(
            subject = %ctx.subject,
            answers = ctx.answers.len(),
            "Requesting answer review report"
        );
        self.model.generate(&prompt, GenerationOptions::report()).await
    }
}
