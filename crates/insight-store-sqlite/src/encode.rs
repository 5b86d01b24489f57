//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Embedded insight arrays and
//! tags are stored as compact JSON. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use insight_core::{
  article::{Article, ArticleStatus},
  insight::{InsightPoint, UserInsight},
  user::{User, UserRole, UserStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_dt_opt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── User enums ──────────────────────────────────────────────────────────────

pub fn encode_role(r: UserRole) -> &'static str {
  match r {
    UserRole::User => "user",
    UserRole::Admin => "admin",
  }
}

pub fn decode_role(s: &str) -> Result<UserRole> {
  match s {
    "user" => Ok(UserRole::User),
    "admin" => Ok(UserRole::Admin),
    other => Err(Error::UnknownValue(format!("user role: {other:?}"))),
  }
}

pub fn encode_user_status(s: UserStatus) -> &'static str {
  match s {
    UserStatus::Active => "active",
    UserStatus::Inactive => "inactive",
    UserStatus::Suspended => "suspended",
  }
}

pub fn decode_user_status(s: &str) -> Result<UserStatus> {
  match s {
    "active" => Ok(UserStatus::Active),
    "inactive" => Ok(UserStatus::Inactive),
    "suspended" => Ok(UserStatus::Suspended),
    other => Err(Error::UnknownValue(format!("user status: {other:?}"))),
  }
}

// ─── Article enums ───────────────────────────────────────────────────────────

pub fn encode_article_status(s: ArticleStatus) -> &'static str {
  match s {
    ArticleStatus::Draft => "draft",
    ArticleStatus::Published => "published",
    ArticleStatus::Archived => "archived",
  }
}

pub fn decode_article_status(s: &str) -> Result<ArticleStatus> {
  match s {
    "draft" => Ok(ArticleStatus::Draft),
    "published" => Ok(ArticleStatus::Published),
    "archived" => Ok(ArticleStatus::Archived),
    other => Err(Error::UnknownValue(format!("article status: {other:?}"))),
  }
}

// ─── Embedded JSON ───────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_insights(insights: &[UserInsight]) -> Result<String> {
  Ok(serde_json::to_string(insights)?)
}

pub fn decode_insights(s: &str) -> Result<Vec<UserInsight>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_points(points: &[InsightPoint]) -> Result<String> {
  Ok(serde_json::to_string(points)?)
}

pub fn decode_points(s: &str) -> Result<Vec<InsightPoint>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:           String,
  pub name:              String,
  pub email:             String,
  pub password_hash:     String,
  pub role:              String,
  pub status:            String,
  pub profile_image_url: Option<String>,
  pub bio:               Option<String>,
  pub created_at:        String,
  pub updated_at:        String,
  pub last_login_at:     Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:                decode_uuid(&self.user_id)?,
      name:              self.name,
      email:             self.email,
      password_hash:     self.password_hash,
      role:              decode_role(&self.role)?,
      status:            decode_user_status(&self.status)?,
      profile_image_url: self.profile_image_url,
      bio:               self.bio,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
      last_login_at:     decode_dt_opt(self.last_login_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:   String,
  pub user_id:      String,
  pub title:        String,
  pub content:      String,
  pub url:          Option<String>,
  pub author:       Option<String>,
  pub source:       Option<String>,
  pub category:     Option<String>,
  pub published_at: Option<String>,
  pub image_url:    Option<String>,
  pub status:       String,
  pub tags:         String,
  pub reading_time: i64,
  pub insights:     String,
  pub ai_insights:  Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
  pub analyzed_at:  Option<String>,
}

impl RawArticle {
  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      id:           decode_uuid(&self.article_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      title:        self.title,
      content:      self.content,
      url:          self.url,
      author:       self.author,
      source:       self.source,
      category:     self.category,
      published_at: decode_dt_opt(self.published_at.as_deref())?,
      image_url:    self.image_url,
      status:       decode_article_status(&self.status)?,
      tags:         decode_tags(&self.tags)?,
      reading_time: self.reading_time.max(0) as u32,
      insights:     decode_insights(&self.insights)?,
      ai_insights:  self.ai_insights.as_deref().map(decode_points).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
      analyzed_at:  decode_dt_opt(self.analyzed_at.as_deref())?,
    })
  }
}
