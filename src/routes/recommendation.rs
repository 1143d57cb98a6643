use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};

use crate::dto::recommendation_dto::{CreateRecommendationPayload, RecommendationResponse, VideoQuery};
use crate::error::Result;
use crate::middleware::cors::USER_EMAIL_HEADER;
use crate::models::recommendation::{BookRecommendationEntry, VideoRecommendationEntry};
use crate::utils::extract::ApiJson;
use crate::AppState;

fn user_email(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_EMAIL_HEADER).and_then(|v| v.to_str().ok())
}

#[axum::debug_handler]
pub async fn list_videos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VideoQuery>,
) -> Result<Json<RecommendationResponse<Vec<VideoRecommendationEntry>>>> {
    let entries = state
        .recommendation_service
        .find_videos(query.subject.as_deref(), user_email(&headers))
        .await?;
    Ok(Json(RecommendationResponse::ok(entries)))
}

#[axum::debug_handler]
pub async fn create_videos(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRecommendationPayload>,
) -> Result<impl IntoResponse> {
    let entry = state.recommendation_service.save_videos(payload).await?;
    Ok((StatusCode::CREATED, Json(RecommendationResponse::ok(entry))))
}

#[axum::debug_handler]
pub async fn list_books(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RecommendationResponse<Vec<BookRecommendationEntry>>>> {
    let entries = state
        .recommendation_service
        .find_books(user_email(&headers))
        .await?;
    Ok(Json(RecommendationResponse::ok(entries)))
}

#[axum::debug_handler]
pub async fn create_books(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRecommendationPayload>,
) -> Result<impl IntoResponse> {
    let entry = state.recommendation_service.save_books(payload).await?;
    Ok((StatusCode::CREATED, Json(RecommendationResponse::ok(entry))))
}
