//! Handlers for the embedded insight endpoints under `/articles/:id`.
//!
//! Insights live inside their article, so every mutation returns the
//! updated article rather than the insight alone.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use insight_core::{
  article::Article,
  insight::{NewUserInsight, UserInsightUpdate},
  store::InsightStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::CurrentUser};

/// `POST /articles/:id/insights`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<NewUserInsight>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  if body.description.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "インサイトの内容を入力してください。".to_owned(),
    ));
  }

  let article = state
    .store
    .add_insight(id, user.0.id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))?;
  Ok((StatusCode::CREATED, Json(article)))
}

/// `PUT /articles/:id/insights/:insight_id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path((id, insight_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<UserInsightUpdate>,
) -> Result<Json<Article>, ApiError>
where
  S: InsightStore,
{
  let article = state
    .store
    .update_insight(id, user.0.id, insight_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("insight {insight_id} not found"))
    })?;
  Ok(Json(article))
}

/// `DELETE /articles/:id/insights/:insight_id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path((id, insight_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Article>, ApiError>
where
  S: InsightStore,
{
  let article = state
    .store
    .delete_insight(id, user.0.id, insight_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("insight {insight_id} not found"))
    })?;
  Ok(Json(article))
}
