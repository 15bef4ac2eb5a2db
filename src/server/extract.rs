//! JSON extractor whose rejections use the API error body.

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::{ApiError, ValidationError};

/// `axum::Json` with rejections mapped to [`ApiError`].
///
/// Missing fields, wrong types, unknown option keys, a bad `Content-Type` and
/// unparseable bodies all become a 400 with `{"detail", "error"}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}
