//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<insight_auth::Error> for ApiError {
  fn from(e: insight_auth::Error) -> Self {
    use insight_auth::Error as Auth;
    match &e {
      Auth::InvalidCredentials | Auth::InvalidToken => {
        ApiError::Unauthorized(e.to_string())
      }
      Auth::AccountDisabled => ApiError::Forbidden(e.to_string()),
      Auth::EmailTaken | Auth::PasswordMismatch | Auth::Validation(_) => {
        ApiError::BadRequest(e.to_string())
      }
      Auth::Store(_) | Auth::Hash(_) | Auth::Token(_) => {
        ApiError::Internal(e.to_string())
      }
    }
  }
}
