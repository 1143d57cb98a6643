pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::store::AssessmentStore;
use crate::services::{
    assessment_service::AssessmentService, model_client::ModelClient,
    prompt_service::PromptService, recommendation_service::RecommendationService,
};

#[derive(Clone)]
pub struct AppState {
    pub assessment_service: AssessmentService,
    pub recommendation_service: RecommendationService,
}

impl AppState {
    pub fn new(
        config: &Config,
        model: Arc<dyn ModelClient>,
        store: Arc<dyn AssessmentStore>,
    ) -> Self {
        Self::with_question_count(config.question_count, model, store)
    }

    pub fn with_question_count(
        question_count: usize,
        model: Arc<dyn ModelClient>,
        store: Arc<dyn AssessmentStore>,
    ) -> Self {
        let prompts = Arc::new(PromptService::with_defaults(question_count));
        let assessment_service = AssessmentService::new(model, store.clone(), prompts);
        let recommendation_service = RecommendationService::new(store);

        Self {
            assessment_service,
            recommendation_service,
        }
    }
}
