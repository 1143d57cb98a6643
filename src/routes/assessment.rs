use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::dto::assessment_dto::{
    AssessmentRequest, EvaluationRequest, EvaluationResponse, GeneratedQuestionsResponse,
    GenerationRequest, QuestionsResponse, ReportsQuery, ReportsResponse, ReviewRequest,
    ReviewResponse,
};
use crate::error::Result;
use crate::utils::extract::ApiJson;
use crate::AppState;

#[axum::debug_handler]
pub async fn handle_assessment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AssessmentRequest>,
) -> Result<Response> {
    match req {
        AssessmentRequest::GenerateQuestions(gen) => {
            let questions = state.assessment_service.generate_questions(&gen).await?;
            Ok(Json(GeneratedQuestionsResponse { result: questions }).into_response())
        }
        AssessmentRequest::EvaluateAnswers(eval) => evaluate(&state, &eval).await,
    }
}

async fn evaluate(state: &AppState, req: &EvaluationRequest) -> Result<Response> {
    let outcome = state.assessment_service.evaluate_answers(req).await?;

    if let Some(details) = outcome.save_error {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to save report to database",
                "details": details,
                "result": outcome.result,
                "score": outcome.score.score,
                "total": outcome.score.total,
            })),
        )
            .into_response());
    }

    Ok(Json(EvaluationResponse {
        result: outcome.result,
        score: outcome.score.score,
        total: outcome.score.total,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ReportsResponse>> {
    let reports = state
        .assessment_service
        .fetch_reports(query.email.as_deref())
        .await?;
    Ok(Json(ReportsResponse { reports }))
}

#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerationRequest>,
) -> Result<Json<QuestionsResponse>> {
    let questions = state.assessment_service.generate_questions(&req).await?;
    Ok(Json(QuestionsResponse {
        message: "Questions generated successfully.".to_string(),
        questions,
    }))
}

#[axum::debug_handler]
pub async fn review_answers(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let result = state.assessment_service.review_answers(&req).await?;
    Ok(Json(ReviewResponse { result }))
}
