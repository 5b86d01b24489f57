//! The `InsightStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `insight-store-sqlite`). Higher layers (`insight-api`, `insight-auth`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  article::{Article, ArticleStatus, ArticleUpdate, NewArticle, UserStats},
  insight::{InsightPoint, NewUserInsight, UserInsightUpdate},
  user::{NewUser, User, UserUpdate},
};

/// Parameters for [`InsightStore::list_articles`].
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
  pub status: Option<ArticleStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// Abstraction over an InsightMaster storage backend.
///
/// Articles embed their insight arrays, so insight mutations are expressed
/// as operations on the owning article and return the updated article.
/// Every article mutation takes the owner's user id and matches on both ids;
/// a non-owner sees the same `None` as a missing article.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait InsightStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new user. Fails if the email is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Apply a partial update; `None` fields are left untouched.
  fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Stamp the user's last-login timestamp.
  fn touch_last_login(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Articles ──────────────────────────────────────────────────────────

  fn create_article(
    &self,
    user_id: Uuid,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  fn get_article(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// The user's articles, newest-updated first.
  fn list_articles<'a>(
    &'a self,
    user_id: Uuid,
    query: &'a ArticleQuery,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + 'a;

  fn count_articles(
    &self,
    user_id: Uuid,
    status: Option<ArticleStatus>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn update_article(
    &self,
    id: Uuid,
    user_id: Uuid,
    update: ArticleUpdate,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// Returns `true` if an owned article was deleted.
  fn delete_article(
    &self,
    id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Embedded insights ─────────────────────────────────────────────────

  fn add_insight(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    input: NewUserInsight,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  fn update_insight(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    insight_id: Uuid,
    update: UserInsightUpdate,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  fn delete_insight(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    insight_id: Uuid,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// Replace the article's AI insight set and stamp `analyzed_at`.
  fn save_ai_insights(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    points: Vec<InsightPoint>,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  // ── Stats ─────────────────────────────────────────────────────────────

  /// Derived dashboard numbers for a user. `since` bounds the
  /// recent-activity window.
  fn user_stats(
    &self,
    user_id: Uuid,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<UserStats, Self::Error>> + Send + '_;
}
