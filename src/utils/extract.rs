use axum::extract::FromRequest;

use crate::error::Error;

/// `axum::Json` whose rejections (bad syntax, missing or mistyped fields)
/// surface as `Error::Validation`, so every bad body is a 400 with the usual
/// `{"error": ...}` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
