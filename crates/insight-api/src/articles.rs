//! Handlers for `/articles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/articles` | Optional `?status=&limit=&offset=` |
//! | `POST`   | `/articles` | 201 |
//! | `GET`    | `/articles/:id` | 403 if not the owner, 404 if missing |
//! | `PUT`    | `/articles/:id` | Partial update |
//! | `DELETE` | `/articles/:id` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use insight_core::{
  article::{Article, ArticleStatus, ArticleUpdate, NewArticle},
  store::{ArticleQuery, InsightStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::CurrentUser};

/// Load `id`, distinguishing missing (404) from not-owned (403).
pub(crate) async fn load_owned<S>(
  state: &AppState<S>,
  user: &CurrentUser,
  id: Uuid,
) -> Result<Article, ApiError>
where
  S: InsightStore,
{
  let article = state
    .store
    .get_article(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))?;

  if article.user_id != user.0.id {
    return Err(ApiError::Forbidden(
      "この記事にアクセスする権限がありません。".to_owned(),
    ));
  }
  Ok(article)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<ArticleStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub articles: Vec<Article>,
  pub total:    u64,
}

/// `GET /articles[?status=&limit=&offset=]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: InsightStore,
{
  let query = ArticleQuery {
    status: params.status,
    limit:  params.limit,
    offset: params.offset,
  };
  let articles = state
    .store
    .list_articles(user.0.id, &query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let total = state
    .store
    .count_articles(user.0.id, params.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ListResponse { articles, total }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /articles`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewArticle>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  if body.title.trim().is_empty() || body.content.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "タイトルと本文は必須です。".to_owned(),
    ));
  }

  let article = state
    .store
    .create_article(user.0.id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(article)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /articles/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError>
where
  S: InsightStore,
{
  let article = load_owned(&state, &user, id).await?;
  Ok(Json(article))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /articles/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<ArticleUpdate>,
) -> Result<Json<Article>, ApiError>
where
  S: InsightStore,
{
  let article = state
    .store
    .update_article(id, user.0.id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))?;
  Ok(Json(article))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /articles/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InsightStore,
{
  let deleted = state
    .store
    .delete_article(id, user.0.id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("article {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
