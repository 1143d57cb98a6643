use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

pub const USER_EMAIL_HEADER: &str = "user-email";

/// Browser clients call the API cross-origin and pass the caller's email
/// through a custom header on recommendation lookups.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_EMAIL_HEADER),
        ])
        .allow_origin(Any)
}
