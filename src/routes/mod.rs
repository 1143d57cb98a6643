pub mod assessment;
pub mod health;
pub mod recommendation;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::middleware::rate_limit::{rps_middleware, RateLimiter};
use crate::AppState;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// All public routes with their rate limit applied. Tracing and CORS are
/// layered by the binary so tests can exercise the bare router.
pub fn api_router(state: AppState, public_rps: u32) -> Router {
    let api = Router::new()
        .route(
            "/api/assessment",
            post(assessment::handle_assessment).get(assessment::list_reports),
        )
        .route("/api/questions", post(assessment::generate_questions))
        .route("/api/report", post(assessment::review_answers))
        .route(
            "/api/youtube",
            get(recommendation::list_videos).post(recommendation::create_videos),
        )
        .route(
            "/api/books",
            get(recommendation::list_books).post(recommendation::create_books),
        )
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(public_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
