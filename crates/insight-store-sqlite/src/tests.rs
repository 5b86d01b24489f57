//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use insight_core::{
  article::{ArticleStatus, ArticleUpdate, NewArticle},
  insight::{
    AnalysisLevel, InsightCategory, InsightPoint, NewUserInsight,
    UserInsightUpdate,
  },
  store::{ArticleQuery, InsightStore},
  user::{NewUser, UserRole, UserStatus, UserUpdate},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str) -> NewUser {
  NewUser {
    name:          "Alice".to_owned(),
    email:         email.to_owned(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_owned(),
  }
}

fn new_article(title: &str) -> NewArticle {
  NewArticle {
    title:        title.to_owned(),
    content:      "記事の本文です。".repeat(10),
    url:          None,
    author:       None,
    source:       None,
    category:     Some("テクノロジー".to_owned()),
    published_at: None,
    image_url:    None,
    status:       None,
    tags:         vec!["tech".to_owned()],
  }
}

fn new_insight(description: &str) -> NewUserInsight {
  NewUserInsight {
    category:    InsightCategory::HiddenAssumption,
    description: description.to_owned(),
    excerpt:     None,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  assert_eq!(user.role, UserRole::User);
  assert_eq!(user.status, UserStatus::Active);

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, user.id);
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.password_hash, user.password_hash);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_user(new_user("alice@example.com")).await.unwrap();

  let err = s.create_user(new_user("alice@example.com")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateEmail(_)));
}

#[tokio::test]
async fn find_user_by_email() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let found = s.find_user_by_email("alice@example.com").await.unwrap();
  assert_eq!(found.unwrap().id, user.id);

  let missing = s.find_user_by_email("nobody@example.com").await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn update_user_applies_partial_fields() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let updated = s
    .update_user(user.id, UserUpdate {
      name: Some("Alice Liddell".to_owned()),
      bio: Some("reader".to_owned()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.name, "Alice Liddell");
  assert_eq!(updated.bio.as_deref(), Some("reader"));
  // Untouched fields survive.
  assert_eq!(updated.email, "alice@example.com");
}

#[tokio::test]
async fn touch_last_login_stamps_timestamp() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  assert!(user.last_login_at.is_none());

  s.touch_last_login(user.id).await.unwrap();
  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert!(fetched.last_login_at.is_some());
}

// ─── Articles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_article() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let article = s
    .create_article(user.id, new_article("AIの進化"))
    .await
    .unwrap();
  assert_eq!(article.status, ArticleStatus::Draft);
  assert!(article.reading_time >= 1);

  let fetched = s.get_article(article.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, article.id);
  assert_eq!(fetched.title, "AIの進化");
  assert_eq!(fetched.tags, vec!["tech".to_owned()]);
  assert!(fetched.insights.is_empty());
  assert!(fetched.ai_insights.is_none());
}

#[tokio::test]
async fn list_articles_filters_by_status() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let a = s.create_article(user.id, new_article("下書き")).await.unwrap();
  let b = s.create_article(user.id, new_article("公開")).await.unwrap();
  s.update_article(b.id, user.id, ArticleUpdate {
    status: Some(ArticleStatus::Published),
    ..Default::default()
  })
  .await
  .unwrap();

  let drafts = s
    .list_articles(user.id, &ArticleQuery {
      status: Some(ArticleStatus::Draft),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(drafts.len(), 1);
  assert_eq!(drafts[0].id, a.id);

  let all = s.list_articles(user.id, &ArticleQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn list_articles_is_owner_scoped() {
  let s = store().await;
  let alice = s.create_user(new_user("alice@example.com")).await.unwrap();
  let bob = s.create_user(new_user("bob@example.com")).await.unwrap();
  s.create_article(alice.id, new_article("aliceの記事")).await.unwrap();

  let bobs = s.list_articles(bob.id, &ArticleQuery::default()).await.unwrap();
  assert!(bobs.is_empty());
}

#[tokio::test]
async fn update_article_recomputes_reading_time() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let article = s.create_article(user.id, new_article("記事")).await.unwrap();

  let long_content = "あ".repeat(5000);
  let updated = s
    .update_article(article.id, user.id, ArticleUpdate {
      content: Some(long_content),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.reading_time, 10);
}

#[tokio::test]
async fn update_article_by_non_owner_returns_none() {
  let s = store().await;
  let alice = s.create_user(new_user("alice@example.com")).await.unwrap();
  let bob = s.create_user(new_user("bob@example.com")).await.unwrap();
  let article = s.create_article(alice.id, new_article("記事")).await.unwrap();

  let result = s
    .update_article(article.id, bob.id, ArticleUpdate {
      title: Some("乗っ取り".to_owned()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_article() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let article = s.create_article(user.id, new_article("記事")).await.unwrap();

  assert!(s.delete_article(article.id, user.id).await.unwrap());
  assert!(s.get_article(article.id).await.unwrap().is_none());
  // Second delete is a no-op.
  assert!(!s.delete_article(article.id, user.id).await.unwrap());
}

// ─── Embedded insights ───────────────────────────────────────────────────────

#[tokio::test]
async fn add_update_and_delete_insight() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let article = s.create_article(user.id, new_article("記事")).await.unwrap();

  let article = s
    .add_insight(article.id, user.id, new_insight("前提条件への指摘"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(article.insights.len(), 1);
  let insight_id = article.insights[0].id;

  let article = s
    .update_insight(article.id, user.id, insight_id, UserInsightUpdate {
      category: Some(InsightCategory::Causality),
      description: Some("因果関係への指摘".to_owned()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(article.insights[0].category, InsightCategory::Causality);
  assert_eq!(article.insights[0].description, "因果関係への指摘");

  let article = s
    .delete_insight(article.id, user.id, insight_id)
    .await
    .unwrap()
    .unwrap();
  assert!(article.insights.is_empty());
}

#[tokio::test]
async fn delete_missing_insight_returns_none() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let article = s.create_article(user.id, new_article("記事")).await.unwrap();

  let result = s
    .delete_insight(article.id, user.id, Uuid::new_v4())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn save_ai_insights_stamps_analyzed_at() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let article = s.create_article(user.id, new_article("記事")).await.unwrap();

  let points = vec![InsightPoint::new(
    article.id,
    InsightCategory::HiddenAssumption,
    "前提条件",
    "記事の前提",
    4,
  )];

  let article = s
    .save_ai_insights(article.id, user.id, points)
    .await
    .unwrap()
    .unwrap();
  assert!(article.analyzed_at.is_some());
  assert_eq!(article.ai_insights.as_ref().unwrap().len(), 1);

  // Round-trips through the JSON column.
  let fetched = s.get_article(article.id).await.unwrap().unwrap();
  let saved = fetched.ai_insights.unwrap();
  assert_eq!(saved[0].category, InsightCategory::HiddenAssumption);
  assert_eq!(saved[0].title, "前提条件");
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_stats_counts_articles_and_insights() {
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();

  let a = s.create_article(user.id, new_article("一本目")).await.unwrap();
  let b = s.create_article(user.id, new_article("二本目")).await.unwrap();
  s.update_article(b.id, user.id, ArticleUpdate {
    status: Some(ArticleStatus::Published),
    ..Default::default()
  })
  .await
  .unwrap();

  s.add_insight(a.id, user.id, new_insight("ひとつ")).await.unwrap();
  s.add_insight(a.id, user.id, new_insight("ふたつ")).await.unwrap();

  let since = Utc::now() - Duration::days(30);
  let stats = s.user_stats(user.id, since).await.unwrap();

  assert_eq!(stats.total_articles, 2);
  assert_eq!(stats.published_articles, 1);
  assert_eq!(stats.draft_articles, 1);
  assert_eq!(stats.total_insights, 2);
  assert_eq!(stats.recent_articles.len(), 2);
  assert_eq!(stats.recent_activity.len(), 2);
  assert_eq!(
    stats.insight_categories,
    vec![(InsightCategory::HiddenAssumption, 2)]
  );
}

#[tokio::test]
async fn analyzer_levels_drive_point_counts() {
  // The heuristic analyzer over a stored article is pure; confirm the
  // store round-trip feeds it the category it keys on.
  let s = store().await;
  let user = s.create_user(new_user("alice@example.com")).await.unwrap();
  let article = s.create_article(user.id, new_article("記事")).await.unwrap();
  let fetched = s.get_article(article.id).await.unwrap().unwrap();

  let analysis =
    insight_core::analyzer::analyze_article(&fetched, AnalysisLevel::Advanced);
  assert_eq!(analysis.insights.len(), 4);
  assert_eq!(analysis.article_id, article.id);
}
