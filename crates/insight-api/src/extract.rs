//! Request extractors.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use insight_core::{store::InsightStore, user::PublicUser};

use crate::{AppState, error::ApiError};

/// The authenticated caller, resolved from `Authorization: Bearer` or the
/// `token` cookie and re-loaded from the store on every request.
pub struct CurrentUser(pub PublicUser);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::to_owned)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
  let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == "token").then(|| value.to_owned())
  })
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: InsightStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .or_else(|| cookie_token(&parts.headers))
      .ok_or_else(|| {
        ApiError::Unauthorized("認証が必要です。".to_owned())
      })?;

    let user = state.auth.validate(&token).await?;
    Ok(CurrentUser(user))
  }
}
