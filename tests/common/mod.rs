#![allow(dead_code)]

use std::sync::Arc;

use assessment_backend::database::store::AssessmentStore;
use assessment_backend::error::Result;
use assessment_backend::services::model_client::{GenerationOptions, ModelClient};
use assessment_backend::services::prompt_service::PromptPair;
use assessment_backend::{routes, AppState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

mockall::mock! {
    pub Model {}

    #[async_trait]
    impl ModelClient for Model {
        async fn generate(&self, prompt: &PromptPair, options: GenerationOptions) -> Result<String>;
    }
}

pub const QUESTION_COUNT: usize = 25;

pub fn app(model: MockModel, store: Arc<dyn AssessmentStore>) -> Router {
    let state = AppState::with_question_count(QUESTION_COUNT, Arc::new(model), store);
    routes::api_router(state, 1_000)
}

pub fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}
