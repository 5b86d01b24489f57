//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Sets the session cookie, 201 |
//! | `POST` | `/auth/login` | Sets the session cookie |
//! | `GET`  | `/auth/validate` | Requires a valid token |
//!
//! The session token travels both in the JSON body and in an `HttpOnly`
//! `token` cookie, so browser clients never handle it from script.

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use insight_core::store::InsightStore;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError, extract::CurrentUser};

fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
  let secure = if secure { "; Secure" } else { "" };
  format!(
    "token={token}; Path=/; HttpOnly; SameSite=Strict; \
     Max-Age={max_age_secs}{secure}"
  )
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:             String,
  pub email:            String,
  pub password:         String,
  pub password_confirm: String,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  let response = state
    .auth
    .register(&body.name, &body.email, &body.password, &body.password_confirm)
    .await?;

  let cookie = session_cookie(
    &response.token,
    state.auth.token_ttl().num_seconds(),
    state.config.secure_cookies,
  );
  Ok((
    StatusCode::CREATED,
    [(header::SET_COOKIE, cookie)],
    Json(response),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  let response = state.auth.login(&body.email, &body.password).await?;

  let cookie = session_cookie(
    &response.token,
    state.auth.token_ttl().num_seconds(),
    state.config.secure_cookies,
  );
  Ok(([(header::SET_COOKIE, cookie)], Json(response)))
}

// ─── Validate ─────────────────────────────────────────────────────────────────

/// `GET /auth/validate`
pub async fn validate<S>(
  user: CurrentUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  Ok(Json(json!({ "valid": true, "user": user.0 })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn session_cookie_shape() {
    let cookie = session_cookie("abc", 604800, false);
    assert_eq!(
      cookie,
      "token=abc; Path=/; HttpOnly; SameSite=Strict; Max-Age=604800"
    );
    assert!(session_cookie("abc", 60, true).ends_with("; Secure"));
  }
}
