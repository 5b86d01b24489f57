//! Handlers for `/users/me` endpoints.

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Duration, Utc};
use insight_core::{
  article::UserStats,
  store::InsightStore,
  user::{PublicUser, UserUpdate},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, extract::CurrentUser};

/// `GET /users/me`
pub async fn me<S>(user: CurrentUser) -> Json<PublicUser>
where
  S: InsightStore,
{
  Json(user.0)
}

// ─── Profile update ───────────────────────────────────────────────────────────

/// Profile fields a user may change about themselves. Email and password
/// have dedicated flows.
#[derive(Debug, Deserialize)]
pub struct UpdateMeBody {
  pub name:              Option<String>,
  pub profile_image_url: Option<String>,
  pub bio:               Option<String>,
}

/// `PATCH /users/me`
pub async fn update_me<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<UpdateMeBody>,
) -> Result<Json<PublicUser>, ApiError>
where
  S: InsightStore,
{
  if let Some(name) = &body.name
    && name.trim().is_empty()
  {
    return Err(ApiError::BadRequest(
      "名前を入力してください。".to_owned(),
    ));
  }

  let update = UserUpdate {
    name: body.name,
    profile_image_url: body.profile_image_url,
    bio: body.bio,
    ..UserUpdate::default()
  };
  let updated = state
    .store
    .update_user(user.0.id, update)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("user not found".to_owned()))?;

  Ok(Json(PublicUser::from(&updated)))
}

// ─── Password ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
  pub current_password: String,
  pub new_password:     String,
}

/// `PUT /users/me/password`
pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<ChangePasswordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  state
    .auth
    .change_password(user.0.id, &body.current_password, &body.new_password)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Stats ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatsParams {
  /// Recent-activity window in days.
  pub days: Option<i64>,
}

/// `GET /users/me/stats[?days=]`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<StatsParams>,
) -> Result<Json<UserStats>, ApiError>
where
  S: InsightStore,
{
  let days = params.days.unwrap_or(30).clamp(1, 365);
  let since = Utc::now() - Duration::days(days);

  let stats = state
    .store
    .user_stats(user.0.id, since)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}
