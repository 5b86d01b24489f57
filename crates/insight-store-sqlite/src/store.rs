//! [`SqliteStore`] — the SQLite implementation of [`InsightStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use insight_core::{
  analyzer,
  article::{
    Article, ArticleStatus, ArticleSummary, ArticleUpdate, NewArticle,
    UserStats,
  },
  insight::{
    InsightPoint, NewUserInsight, UserInsight, UserInsightUpdate,
    NAMED_CATEGORIES,
  },
  store::{ArticleQuery, InsightStore},
  user::{NewUser, User, UserRole, UserStatus, UserUpdate},
};

use crate::{
  encode::{
    encode_article_status, encode_dt, encode_insights, encode_points,
    encode_role, encode_tags, encode_user_status, encode_uuid, RawArticle,
    RawUser,
  },
  schema::SCHEMA,
  Error, Result,
};

const USER_COLS: &str = "user_id, name, email, password_hash, role, status, \
                         profile_image_url, bio, created_at, updated_at, last_login_at";

const ARTICLE_COLS: &str =
  "article_id, user_id, title, content, url, author, source, category, \
   published_at, image_url, status, tags, reading_time, insights, \
   ai_insights, created_at, updated_at, analyzed_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:           row.get(0)?,
    name:              row.get(1)?,
    email:             row.get(2)?,
    password_hash:     row.get(3)?,
    role:              row.get(4)?,
    status:            row.get(5)?,
    profile_image_url: row.get(6)?,
    bio:               row.get(7)?,
    created_at:        row.get(8)?,
    updated_at:        row.get(9)?,
    last_login_at:     row.get(10)?,
  })
}

fn article_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawArticle> {
  Ok(RawArticle {
    article_id:   row.get(0)?,
    user_id:      row.get(1)?,
    title:        row.get(2)?,
    content:      row.get(3)?,
    url:          row.get(4)?,
    author:       row.get(5)?,
    source:       row.get(6)?,
    category:     row.get(7)?,
    published_at: row.get(8)?,
    image_url:    row.get(9)?,
    status:       row.get(10)?,
    tags:         row.get(11)?,
    reading_time: row.get(12)?,
    insights:     row.get(13)?,
    ai_insights:  row.get(14)?,
    created_at:   row.get(15)?,
    updated_at:   row.get(16)?,
    analyzed_at:  row.get(17)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An InsightMaster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_user_where(
    &self,
    where_clause: &'static str,
    param: String,
  ) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE {where_clause}"),
              rusqlite::params![param],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Persist every mutable column of `user`.
  async fn persist_user(&self, user: &User) -> Result<()> {
    let id            = encode_uuid(user.id);
    let name          = user.name.clone();
    let email         = user.email.clone();
    let password_hash = user.password_hash.clone();
    let role          = encode_role(user.role).to_owned();
    let status        = encode_user_status(user.status).to_owned();
    let image_url     = user.profile_image_url.clone();
    let bio           = user.bio.clone();
    let updated_at    = encode_dt(user.updated_at);
    let last_login_at = user.last_login_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET
             name = ?2, email = ?3, password_hash = ?4, role = ?5,
             status = ?6, profile_image_url = ?7, bio = ?8,
             updated_at = ?9, last_login_at = ?10
           WHERE user_id = ?1",
          rusqlite::params![
            id, name, email, password_hash, role, status, image_url, bio,
            updated_at, last_login_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_article_owned(
    &self,
    id: Uuid,
    user_id: Uuid,
  ) -> Result<Option<Article>> {
    let id_str = encode_uuid(id);
    let user_str = encode_uuid(user_id);

    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ARTICLE_COLS} FROM articles
                 WHERE article_id = ?1 AND user_id = ?2"
              ),
              rusqlite::params![id_str, user_str],
              article_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  /// Persist every mutable column of `article`, embedded arrays included.
  async fn persist_article(&self, article: &Article) -> Result<()> {
    let id           = encode_uuid(article.id);
    let title        = article.title.clone();
    let content      = article.content.clone();
    let url          = article.url.clone();
    let author       = article.author.clone();
    let source       = article.source.clone();
    let category     = article.category.clone();
    let published_at = article.published_at.map(encode_dt);
    let image_url    = article.image_url.clone();
    let status       = encode_article_status(article.status).to_owned();
    let tags         = encode_tags(&article.tags)?;
    let reading_time = article.reading_time as i64;
    let insights     = encode_insights(&article.insights)?;
    let ai_insights  = article
      .ai_insights
      .as_deref()
      .map(encode_points)
      .transpose()?;
    let updated_at   = encode_dt(article.updated_at);
    let analyzed_at  = article.analyzed_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE articles SET
             title = ?2, content = ?3, url = ?4, author = ?5, source = ?6,
             category = ?7, published_at = ?8, image_url = ?9, status = ?10,
             tags = ?11, reading_time = ?12, insights = ?13,
             ai_insights = ?14, updated_at = ?15, analyzed_at = ?16
           WHERE article_id = ?1",
          rusqlite::params![
            id, title, content, url, author, source, category, published_at,
            image_url, status, tags, reading_time, insights, ai_insights,
            updated_at, analyzed_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── InsightStore impl ───────────────────────────────────────────────────────

impl InsightStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    if let Some(existing) = self.find_user_by_email(&input.email).await? {
      return Err(Error::DuplicateEmail(existing.email));
    }

    let now = Utc::now();
    let user = User {
      id:                Uuid::new_v4(),
      name:              input.name,
      email:             input.email,
      password_hash:     input.password_hash,
      role:              UserRole::User,
      status:            UserStatus::Active,
      profile_image_url: None,
      bio:               None,
      created_at:        now,
      updated_at:        now,
      last_login_at:     None,
    };

    let id            = encode_uuid(user.id);
    let name          = user.name.clone();
    let email         = user.email.clone();
    let password_hash = user.password_hash.clone();
    let role          = encode_role(user.role).to_owned();
    let status        = encode_user_status(user.status).to_owned();
    let at            = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, name, email, password_hash, role, status,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![id, name, email, password_hash, role, status, at],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.fetch_user_where("email = ?1", email.to_owned()).await
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.fetch_user_where("user_id = ?1", encode_uuid(id)).await
  }

  async fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> Result<Option<User>> {
    let Some(mut user) = self.get_user(id).await? else {
      return Ok(None);
    };

    if let Some(name) = update.name {
      user.name = name;
    }
    if let Some(email) = update.email {
      user.email = email;
    }
    if let Some(hash) = update.password_hash {
      user.password_hash = hash;
    }
    if let Some(url) = update.profile_image_url {
      user.profile_image_url = Some(url);
    }
    if let Some(bio) = update.bio {
      user.bio = Some(bio);
    }
    user.updated_at = Utc::now();

    self.persist_user(&user).await?;
    Ok(Some(user))
  }

  async fn touch_last_login(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET last_login_at = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn create_article(
    &self,
    user_id: Uuid,
    input: NewArticle,
  ) -> Result<Article> {
    let now = Utc::now();
    let article = Article {
      id:           Uuid::new_v4(),
      user_id,
      reading_time: Article::reading_time_for(&input.content),
      title:        input.title,
      content:      input.content,
      url:          input.url,
      author:       input.author,
      source:       input.source,
      category:     input.category,
      published_at: input.published_at,
      image_url:    input.image_url,
      status:       input.status.unwrap_or_default(),
      tags:         input.tags,
      insights:     Vec::new(),
      ai_insights:  None,
      created_at:   now,
      updated_at:   now,
      analyzed_at:  None,
    };

    let id           = encode_uuid(article.id);
    let user_str     = encode_uuid(user_id);
    let title        = article.title.clone();
    let content      = article.content.clone();
    let url          = article.url.clone();
    let author       = article.author.clone();
    let source       = article.source.clone();
    let category     = article.category.clone();
    let published_at = article.published_at.map(encode_dt);
    let image_url    = article.image_url.clone();
    let status       = encode_article_status(article.status).to_owned();
    let tags         = encode_tags(&article.tags)?;
    let reading_time = article.reading_time as i64;
    let at           = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO articles (
             article_id, user_id, title, content, url, author, source,
             category, published_at, image_url, status, tags, reading_time,
             insights, ai_insights, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     '[]', NULL, ?14, ?14)",
          rusqlite::params![
            id, user_str, title, content, url, author, source, category,
            published_at, image_url, status, tags, reading_time, at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(article)
  }

  async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ARTICLE_COLS} FROM articles WHERE article_id = ?1"
              ),
              rusqlite::params![id_str],
              article_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn list_articles(
    &self,
    user_id: Uuid,
    query: &ArticleQuery,
  ) -> Result<Vec<Article>> {
    let user_str   = encode_uuid(user_id);
    let status_str = query.status.map(encode_article_status).map(str::to_owned);
    let limit_val  = query.limit.unwrap_or(50) as i64;
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawArticle> = self
      .conn
      .call(move |conn| {
        let where_clause = if status_str.is_some() {
          "WHERE user_id = ?1 AND status = ?2"
        } else {
          "WHERE user_id = ?1"
        };

        let sql = format!(
          "SELECT {ARTICLE_COLS} FROM articles
           {where_clause}
           ORDER BY updated_at DESC
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              user_str,
              status_str.as_deref(),
              limit_val,
              offset_val,
            ],
            article_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }

  async fn count_articles(
    &self,
    user_id: Uuid,
    status: Option<ArticleStatus>,
  ) -> Result<u64> {
    let user_str   = encode_uuid(user_id);
    let status_str = status.map(encode_article_status).map(str::to_owned);

    let count: i64 = self
      .conn
      .call(move |conn| {
        let count = if let Some(s) = status_str {
          conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE user_id = ?1 AND status = ?2",
            rusqlite::params![user_str, s],
            |r| r.get(0),
          )?
        } else {
          conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE user_id = ?1",
            rusqlite::params![user_str],
            |r| r.get(0),
          )?
        };
        Ok(count)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  async fn update_article(
    &self,
    id: Uuid,
    user_id: Uuid,
    update: ArticleUpdate,
  ) -> Result<Option<Article>> {
    let Some(mut article) = self.fetch_article_owned(id, user_id).await? else {
      return Ok(None);
    };

    if let Some(title) = update.title {
      article.title = title;
    }
    if let Some(content) = update.content {
      article.reading_time = Article::reading_time_for(&content);
      article.content = content;
    }
    if let Some(url) = update.url {
      article.url = Some(url);
    }
    if let Some(author) = update.author {
      article.author = Some(author);
    }
    if let Some(source) = update.source {
      article.source = Some(source);
    }
    if let Some(category) = update.category {
      article.category = Some(category);
    }
    if let Some(published_at) = update.published_at {
      article.published_at = Some(published_at);
    }
    if let Some(image_url) = update.image_url {
      article.image_url = Some(image_url);
    }
    if let Some(status) = update.status {
      article.status = status;
    }
    if let Some(tags) = update.tags {
      article.tags = tags;
    }
    article.updated_at = Utc::now();

    self.persist_article(&article).await?;
    Ok(Some(article))
  }

  async fn delete_article(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let user_str = encode_uuid(user_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM articles WHERE article_id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Embedded insights ─────────────────────────────────────────────────────

  async fn add_insight(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    input: NewUserInsight,
  ) -> Result<Option<Article>> {
    let Some(mut article) =
      self.fetch_article_owned(article_id, user_id).await?
    else {
      return Ok(None);
    };

    let now = Utc::now();
    article.insights.push(UserInsight {
      id:          Uuid::new_v4(),
      category:    input.category,
      description: input.description,
      excerpt:     input.excerpt,
      created_at:  now,
      updated_at:  now,
    });
    article.updated_at = now;

    self.persist_article(&article).await?;
    Ok(Some(article))
  }

  async fn update_insight(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    insight_id: Uuid,
    update: UserInsightUpdate,
  ) -> Result<Option<Article>> {
    let Some(mut article) =
      self.fetch_article_owned(article_id, user_id).await?
    else {
      return Ok(None);
    };

    let now = Utc::now();
    let Some(insight) =
      article.insights.iter_mut().find(|i| i.id == insight_id)
    else {
      return Ok(None);
    };

    if let Some(category) = update.category {
      insight.category = category;
    }
    if let Some(description) = update.description {
      insight.description = description;
    }
    if let Some(excerpt) = update.excerpt {
      insight.excerpt = Some(excerpt);
    }
    insight.updated_at = now;
    article.updated_at = now;

    self.persist_article(&article).await?;
    Ok(Some(article))
  }

  async fn delete_insight(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    insight_id: Uuid,
  ) -> Result<Option<Article>> {
    let Some(mut article) =
      self.fetch_article_owned(article_id, user_id).await?
    else {
      return Ok(None);
    };

    let before = article.insights.len();
    article.insights.retain(|i| i.id != insight_id);
    if article.insights.len() == before {
      return Ok(None);
    }
    article.updated_at = Utc::now();

    self.persist_article(&article).await?;
    Ok(Some(article))
  }

  async fn save_ai_insights(
    &self,
    article_id: Uuid,
    user_id: Uuid,
    points: Vec<InsightPoint>,
  ) -> Result<Option<Article>> {
    let Some(mut article) =
      self.fetch_article_owned(article_id, user_id).await?
    else {
      return Ok(None);
    };

    let now = Utc::now();
    article.ai_insights = Some(points);
    article.analyzed_at = Some(now);
    article.updated_at = now;

    self.persist_article(&article).await?;
    Ok(Some(article))
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  async fn user_stats(
    &self,
    user_id: Uuid,
    since: DateTime<Utc>,
  ) -> Result<UserStats> {
    // The per-user article set is small; fold the stats in Rust rather than
    // pushing JSON aggregation into SQL.
    let articles = self
      .list_articles(user_id, &ArticleQuery {
        status: None,
        limit:  Some(usize::MAX >> 1),
        offset: None,
      })
      .await?;

    let published = articles
      .iter()
      .filter(|a| a.status == ArticleStatus::Published)
      .count() as u64;
    let drafts = articles
      .iter()
      .filter(|a| a.status == ArticleStatus::Draft)
      .count() as u64;
    let total_insights =
      articles.iter().map(|a| a.insights.len() as u64).sum();

    let summary = |a: &Article| ArticleSummary {
      id:            a.id,
      title:         a.title.clone(),
      category:      a.category.clone(),
      created_at:    a.created_at,
      insight_count: a.insights.len(),
    };

    let mut by_created: Vec<&Article> = articles.iter().collect();
    by_created.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let recent_articles = by_created.iter().take(5).map(|a| summary(a)).collect();
    let recent_activity = by_created
      .iter()
      .filter(|a| a.created_at >= since)
      .map(|a| summary(a))
      .collect();

    let all_insights: Vec<_> = articles
      .iter()
      .flat_map(|a| a.insights.iter().cloned())
      .collect();
    let counts = analyzer::count_user_categories(&all_insights);
    let insight_categories = NAMED_CATEGORIES
      .into_iter()
      .filter_map(|c| counts.get(&c).map(|n| (c, *n)))
      .collect();

    Ok(UserStats {
      total_articles: published + drafts,
      published_articles: published,
      draft_articles: drafts,
      total_insights,
      recent_articles,
      insight_categories,
      recent_activity,
    })
  }
}
