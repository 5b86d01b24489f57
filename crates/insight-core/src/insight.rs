//! Insight types — the fundamental unit of the training loop.
//!
//! An insight is a discrete observation about an article. AI- or
//! heuristically-generated observations are [`InsightPoint`]s; the user's
//! hand-written counterparts are [`UserInsight`]s. Both carry one of a fixed
//! set of categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Categories ──────────────────────────────────────────────────────────────

/// The fixed category taxonomy for insights.
///
/// `Other` is the explicit fallback produced at the AI-response parsing
/// boundary for category strings outside the taxonomy; it never participates
/// in strength/weakness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
  HiddenAssumption,
  Causality,
  Contradiction,
  DataInterpretation,
  AuthorBias,
  IndustryTrend,
  Other,
}

/// The six named categories, in canonical order. Excludes [`InsightCategory::Other`].
pub const NAMED_CATEGORIES: [InsightCategory; 6] = [
  InsightCategory::HiddenAssumption,
  InsightCategory::Causality,
  InsightCategory::Contradiction,
  InsightCategory::DataInterpretation,
  InsightCategory::AuthorBias,
  InsightCategory::IndustryTrend,
];

impl InsightCategory {
  /// The identifier string used on the wire and in prompts.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::HiddenAssumption => "hidden_assumption",
      Self::Causality => "causality",
      Self::Contradiction => "contradiction",
      Self::DataInterpretation => "data_interpretation",
      Self::AuthorBias => "author_bias",
      Self::IndustryTrend => "industry_trend",
      Self::Other => "other",
    }
  }

  /// Japanese display label.
  pub fn label(&self) -> &'static str {
    match self {
      Self::HiddenAssumption => "隠れた前提条件",
      Self::Causality => "因果関係",
      Self::Contradiction => "矛盾点",
      Self::DataInterpretation => "データの解釈方法",
      Self::AuthorBias => "著者のバイアス",
      Self::IndustryTrend => "業界トレンドとの関連性",
      Self::Other => "その他",
    }
  }

  /// Longer Japanese description, shown alongside the label in clients.
  pub fn description(&self) -> &'static str {
    match self {
      Self::HiddenAssumption => {
        "文章中で明示的に述べられていないが、議論の前提となっている仮定や条件"
      }
      Self::Causality => "事象間の因果関係の主張とその根拠の妥当性",
      Self::Contradiction => "文章内の矛盾点や一貫性のない主張",
      Self::DataInterpretation => "データや統計の解釈方法とその妥当性",
      Self::AuthorBias => "著者の視点や立場によるバイアス",
      Self::IndustryTrend => "業界や分野の動向との関連性",
      Self::Other => "既存のカテゴリーに当てはまらない洞察",
    }
  }

  /// Coerce a free-form category string (as returned by an LLM) into the
  /// taxonomy. Matching is case-insensitive; the identifier may be embedded
  /// in surrounding text. Anything unrecognised becomes
  /// [`InsightCategory::Other`].
  pub fn coerce(raw: &str) -> Self {
    let lower = raw.to_lowercase();
    for category in NAMED_CATEGORIES {
      if lower.contains(category.as_str()) || lower.contains(category.label()) {
        return category;
      }
    }
    Self::Other
  }
}

// ─── Analysis level ──────────────────────────────────────────────────────────

/// How deep a generation pass goes. Controls how many insight points are
/// synthesised and which categories are included.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisLevel {
  #[default]
  Beginner,
  Intermediate,
  Advanced,
}

impl AnalysisLevel {
  /// Target point count for an AI generation pass at this level.
  pub fn point_count(&self) -> usize {
    match self {
      Self::Beginner => 3,
      Self::Intermediate => 5,
      Self::Advanced => 7,
    }
  }
}

// ─── Insight points ──────────────────────────────────────────────────────────

/// An AI- or heuristically-generated observation about an article.
/// Immutable once created by an analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightPoint {
  pub id:          Uuid,
  pub article_id:  Uuid,
  pub category:    InsightCategory,
  pub title:       String,
  pub description: String,
  /// Source-text excerpt the point is grounded on, when available.
  pub excerpt:     Option<String>,
  /// 1 (minor) to 5 (central). Clamped at the parsing boundary.
  pub importance:  u8,
  pub created_at:  DateTime<Utc>,
}

impl InsightPoint {
  pub fn new(
    article_id: Uuid,
    category: InsightCategory,
    title: impl Into<String>,
    description: impl Into<String>,
    importance: u8,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      article_id,
      category,
      title: title.into(),
      description: description.into(),
      excerpt: None,
      importance: importance.clamp(1, 5),
      created_at: Utc::now(),
    }
  }
}

/// A user-authored observation, recorded against an article during a
/// training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInsight {
  pub id:          Uuid,
  pub category:    InsightCategory,
  pub description: String,
  pub excerpt:     Option<String>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input for recording a new [`UserInsight`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserInsight {
  pub category:    InsightCategory,
  pub description: String,
  pub excerpt:     Option<String>,
}

/// Partial update for an existing [`UserInsight`]. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInsightUpdate {
  pub category:    Option<InsightCategory>,
  pub description: Option<String>,
  pub excerpt:     Option<String>,
}

// ─── Analysis results ────────────────────────────────────────────────────────

/// The result of running the heuristic analyzer over one article at one
/// analysis level. Session-scoped; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightAnalysis {
  pub id:         Uuid,
  pub article_id: Uuid,
  pub insights:   Vec<InsightPoint>,
  pub summary:    String,
  pub level:      AnalysisLevel,
  pub created_at: DateTime<Utc>,
}

/// One user insight paired with its best-matching AI point, if any.
#[derive(Debug, Clone, Serialize)]
pub struct InsightComparison {
  pub user_insight: UserInsight,
  pub ai_insight:   Option<InsightPoint>,
  /// Per-pair similarity in [0.0, 1.0].
  pub match_score:  f64,
  pub feedback:     String,
}
