//! Article types.
//!
//! An article owns its insight annotations: the user-written list and the
//! optional AI-generated list are embedded in the article itself, mirroring
//! the document shape stored by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::insight::{InsightCategory, InsightPoint, UserInsight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
  #[default]
  Draft,
  Published,
  Archived,
}

/// A captured article together with its embedded insight annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
  pub id:           Uuid,
  pub user_id:      Uuid,
  pub title:        String,
  pub content:      String,
  pub url:          Option<String>,
  pub author:       Option<String>,
  pub source:       Option<String>,
  /// Free-text topic label (e.g. テクノロジー), used by the heuristic
  /// analyzer to pick relevant insight templates.
  pub category:     Option<String>,
  pub published_at: Option<DateTime<Utc>>,
  pub image_url:    Option<String>,
  pub status:       ArticleStatus,
  pub tags:         Vec<String>,
  /// Estimated reading time in minutes, derived from content length.
  pub reading_time: u32,
  pub insights:     Vec<UserInsight>,
  /// The saved result of the most recent AI analysis, if any.
  pub ai_insights:  Option<Vec<InsightPoint>>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  pub analyzed_at:  Option<DateTime<Utc>>,
}

impl Article {
  /// Estimated reading time for `content`, in minutes, floor 1.
  ///
  /// Japanese text carries no word boundaries, so this counts characters
  /// rather than words (roughly 500 characters per minute).
  pub fn reading_time_for(content: &str) -> u32 {
    let chars = content.chars().count() as u32;
    (chars / 500).max(1)
  }
}

/// Input to [`crate::store::InsightStore::create_article`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewArticle {
  pub title:        String,
  pub content:      String,
  pub url:          Option<String>,
  pub author:       Option<String>,
  pub source:       Option<String>,
  pub category:     Option<String>,
  pub published_at: Option<DateTime<Utc>>,
  pub image_url:    Option<String>,
  pub status:       Option<ArticleStatus>,
  #[serde(default)]
  pub tags:         Vec<String>,
}

/// Partial article update. `None` fields are left untouched; a content
/// change recomputes the reading time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleUpdate {
  pub title:        Option<String>,
  pub content:      Option<String>,
  pub url:          Option<String>,
  pub author:       Option<String>,
  pub source:       Option<String>,
  pub category:     Option<String>,
  pub published_at: Option<DateTime<Utc>>,
  pub image_url:    Option<String>,
  pub status:       Option<ArticleStatus>,
  pub tags:         Option<Vec<String>>,
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// A single row in the recent-articles section of [`UserStats`].
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
  pub id:            Uuid,
  pub title:         String,
  pub category:      Option<String>,
  pub created_at:    DateTime<Utc>,
  pub insight_count: usize,
}

/// Per-user dashboard numbers — always derived, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
  pub total_articles:     u64,
  pub published_articles: u64,
  pub draft_articles:     u64,
  pub total_insights:     u64,
  pub recent_articles:    Vec<ArticleSummary>,
  /// User insight counts keyed by category identifier.
  pub insight_categories: Vec<(InsightCategory, u64)>,
  /// Articles created in the stats window, newest first.
  pub recent_activity:    Vec<ArticleSummary>,
}
