//! Handlers for analysis, comparison, and ad-hoc generation.
//!
//! AI calls degrade gracefully: any client error is logged with `warn!`
//! and replaced by the deterministic substitutes in [`insight_ai::mock`],
//! so these endpoints never fail because the LLM is unreachable.

use axum::{
  Json,
  extract::{Path, State},
};
use insight_core::{
  analyzer,
  insight::{
    AnalysisLevel, InsightCategory, InsightComparison, InsightPoint,
  },
  store::InsightStore,
};
use insight_ai::mock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use crate::{
  AppState, articles::load_owned, error::ApiError, extract::CurrentUser,
};

// ─── Analyze ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
  #[serde(default)]
  pub level:   AnalysisLevel,
  /// Skip the LLM and run the heuristic analyzer; the result is returned
  /// but not persisted.
  #[serde(default)]
  pub offline: bool,
}

/// `POST /articles/:id/analyze`
pub async fn analyze<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<AnalyzeBody>,
) -> Result<Json<Value>, ApiError>
where
  S: InsightStore,
{
  let article = load_owned(&state, &user, id).await?;

  if body.offline {
    let analysis = analyzer::analyze_article(&article, body.level);
    return Ok(Json(json!({ "persisted": false, "analysis": analysis })));
  }

  let points = match state
    .ai
    .generate_insights(&article, body.level, None)
    .await
  {
    Ok(points) => points,
    Err(e) => {
      warn!(article_id = %id, error = %e, "AI analysis failed, using fallback set");
      mock::fallback_insights(id)
    }
  };

  let article = state
    .store
    .save_ai_insights(id, user.0.id, points)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))?;

  Ok(Json(json!({ "persisted": true, "article": article })))
}

/// `GET /articles/:id/analyze` — status of the saved analysis.
pub async fn status<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: InsightStore,
{
  let article = load_owned(&state, &user, id).await?;
  Ok(Json(json!({
    "analyzed": article.ai_insights.is_some(),
    "analyzed_at": article.analyzed_at,
    "insights": article.ai_insights.unwrap_or_default(),
  })))
}

// ─── Compare ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CompareResponse {
  /// Aggregate keyword-overlap score, 0-100.
  pub match_score:     u8,
  pub comparisons:     Vec<InsightComparison>,
  pub strengths:       Vec<InsightCategory>,
  pub weaknesses:      Vec<InsightCategory>,
  pub recommendations: Vec<String>,
}

/// `POST /articles/:id/compare`
///
/// Requires both the user's insights and a saved AI analysis; 400
/// otherwise.
pub async fn compare<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<CompareResponse>, ApiError>
where
  S: InsightStore,
{
  let article = load_owned(&state, &user, id).await?;

  let ai_insights = article.ai_insights.as_deref().unwrap_or(&[]);
  if article.insights.is_empty() || ai_insights.is_empty() {
    return Err(ApiError::BadRequest(
      "比較にはユーザーのインサイトとAIの分析結果の両方が必要です。"
        .to_owned(),
    ));
  }

  let descriptions: Vec<String> = article
    .insights
    .iter()
    .map(|i| i.description.clone())
    .collect();
  let match_score = analyzer::compare_insights(&descriptions, ai_insights);

  let comparisons = match state
    .ai
    .compare_insights(&article.insights, ai_insights)
    .await
  {
    Ok(comparisons) => comparisons,
    Err(e) => {
      warn!(article_id = %id, error = %e, "AI comparison failed, using category heuristic");
      mock::simple_comparisons(&article.insights, ai_insights)
    }
  };

  let breakdown = analyzer::classify_categories(
    &analyzer::count_user_categories(&article.insights),
    &analyzer::count_point_categories(ai_insights),
  );
  let recommendations =
    analyzer::recommendations(match_score, &breakdown.weaknesses);

  Ok(Json(CompareResponse {
    match_score,
    comparisons,
    strengths: breakdown.strengths,
    weaknesses: breakdown.weaknesses,
    recommendations,
  }))
}

// ─── Ad-hoc generation ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
  pub article_id: Uuid,
  #[serde(default)]
  pub level:      AnalysisLevel,
  /// Optional extra direction passed through to the prompt.
  pub prompt:     Option<String>,
}

/// `POST /ai/generate-insights` — generation without persistence.
pub async fn generate<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<GenerateBody>,
) -> Result<Json<Vec<InsightPoint>>, ApiError>
where
  S: InsightStore,
{
  let article = load_owned(&state, &user, body.article_id).await?;

  let points = match state
    .ai
    .generate_insights(&article, body.level, body.prompt.as_deref())
    .await
  {
    Ok(points) => points,
    Err(e) => {
      warn!(article_id = %article.id, error = %e, "AI generation failed, using fallback set");
      mock::fallback_insights(article.id)
    }
  };

  Ok(Json(points))
}
