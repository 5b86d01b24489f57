//! Defensive parsing of model replies.
//!
//! Models are asked for strict JSON but routinely wrap it in prose or code
//! fences, so the first JSON array is extracted by regex and each element
//! is pulled apart field-by-field with per-field defaults rather than a
//! strict deserialize.

use std::sync::LazyLock;

use insight_core::insight::{
  InsightCategory, InsightComparison, InsightPoint, UserInsight,
};
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, Result};

/// Greedy: first `[` to last `]`, across newlines.
static JSON_ARRAY_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array regex"));

const DEFAULT_IMPORTANCE: u8 = 3;

fn extract_array(response: &str) -> Result<Vec<Value>> {
  let matched = JSON_ARRAY_RE
    .find(response)
    .ok_or_else(|| Error::Parse("no JSON array in response".to_owned()))?;
  serde_json::from_str(matched.as_str())
    .map_err(|e| Error::Parse(e.to_string()))
}

fn importance_of(value: &Value) -> u8 {
  match value.get("importance").and_then(Value::as_f64) {
    Some(n) if n.is_finite() => (n.round() as i64).clamp(1, 5) as u8,
    _ => DEFAULT_IMPORTANCE,
  }
}

/// Parse generated insight points out of a model reply.
///
/// Elements without a description are dropped; unknown categories become
/// [`InsightCategory::Other`]; importance is clamped to 1-5 with a default
/// of 3 when absent or malformed.
pub fn parse_points(
  response: &str,
  article_id: Uuid,
) -> Result<Vec<InsightPoint>> {
  let items = extract_array(response)?;

  let points = items
    .iter()
    .filter_map(|item| {
      let description = item.get("description")?.as_str()?.to_owned();
      let category = item
        .get("category")
        .and_then(Value::as_str)
        .map(InsightCategory::coerce)
        .unwrap_or(InsightCategory::Other);
      let title = item
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| category.label().to_owned());

      let mut point = InsightPoint::new(
        article_id,
        category,
        title,
        description,
        importance_of(item),
      );
      point.excerpt = item
        .get("evidence")
        .and_then(Value::as_str)
        .map(str::to_owned);
      Some(point)
    })
    .collect::<Vec<_>>();

  if points.is_empty() {
    return Err(Error::Parse("no usable insights in response".to_owned()));
  }
  Ok(points)
}

/// Parse comparison results out of a model reply.
///
/// Elements with a missing or out-of-range user index are dropped; an
/// out-of-range AI index degrades to "no match"; scores are clamped to
/// [0, 1].
pub fn parse_comparisons(
  response: &str,
  user_insights: &[UserInsight],
  ai_insights: &[InsightPoint],
) -> Result<Vec<InsightComparison>> {
  let items = extract_array(response)?;

  Ok(
    items
      .iter()
      .filter_map(|item| {
        let user_idx =
          item.get("user_insight_index").and_then(Value::as_u64)? as usize;
        let user_insight = user_insights.get(user_idx)?.clone();

        let ai_insight = item
          .get("ai_insight_index")
          .and_then(Value::as_u64)
          .and_then(|i| ai_insights.get(i as usize))
          .cloned();

        let match_score = item
          .get("match_score")
          .and_then(Value::as_f64)
          .unwrap_or(0.0)
          .clamp(0.0, 1.0);

        let feedback = item
          .get("feedback")
          .and_then(Value::as_str)
          .unwrap_or_default()
          .to_owned();

        Some(InsightComparison {
          user_insight,
          ai_insight,
          match_score,
          feedback,
        })
      })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn user_insight(description: &str) -> UserInsight {
    UserInsight {
      id:          Uuid::new_v4(),
      category:    InsightCategory::Causality,
      description: description.to_owned(),
      excerpt:     None,
      created_at:  Utc::now(),
      updated_at:  Utc::now(),
    }
  }

  #[test]
  fn parses_array_wrapped_in_prose() {
    let response = r#"以下が分析結果です。
[
  {"title": "前提", "description": "暗黙の前提がある", "category": "hidden_assumption", "evidence": "第2段落", "importance": 4}
]
ご確認ください。"#;

    let points = parse_points(response, Uuid::new_v4()).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].category, InsightCategory::HiddenAssumption);
    assert_eq!(points[0].importance, 4);
    assert_eq!(points[0].excerpt.as_deref(), Some("第2段落"));
  }

  #[test]
  fn unknown_category_becomes_other() {
    let response =
      r#"[{"title": "t", "description": "d", "category": "novel_idea"}]"#;
    let points = parse_points(response, Uuid::new_v4()).unwrap();
    assert_eq!(points[0].category, InsightCategory::Other);
  }

  #[test]
  fn importance_is_clamped_and_defaulted() {
    let response = r#"[
      {"title": "a", "description": "d", "category": "causality", "importance": 99},
      {"title": "b", "description": "d", "category": "causality", "importance": "high"},
      {"title": "c", "description": "d", "category": "causality"}
    ]"#;
    let points = parse_points(response, Uuid::new_v4()).unwrap();
    assert_eq!(points[0].importance, 5);
    assert_eq!(points[1].importance, 3);
    assert_eq!(points[2].importance, 3);
  }

  #[test]
  fn elements_without_description_are_dropped() {
    let response = r#"[
      {"title": "no description", "category": "causality"},
      {"title": "ok", "description": "d", "category": "causality"}
    ]"#;
    let points = parse_points(response, Uuid::new_v4()).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].title, "ok");
  }

  #[test]
  fn missing_array_is_an_error() {
    assert!(parse_points("すみません、JSONを生成できません。", Uuid::new_v4())
      .is_err());
  }

  #[test]
  fn comparison_indices_are_bounds_checked() {
    let users = vec![user_insight("u0"), user_insight("u1")];
    let article_id = Uuid::new_v4();
    let ais = vec![InsightPoint::new(
      article_id,
      InsightCategory::Causality,
      "t",
      "d",
      3,
    )];

    let response = r#"[
      {"user_insight_index": 0, "ai_insight_index": 0, "match_score": 1.7, "feedback": "good"},
      {"user_insight_index": 1, "ai_insight_index": 9, "match_score": -0.2, "feedback": "none"},
      {"user_insight_index": 5, "ai_insight_index": 0, "match_score": 0.5, "feedback": "dropped"}
    ]"#;

    let comparisons = parse_comparisons(response, &users, &ais).unwrap();
    assert_eq!(comparisons.len(), 2);
    assert_eq!(comparisons[0].match_score, 1.0);
    assert!(comparisons[0].ai_insight.is_some());
    assert_eq!(comparisons[1].match_score, 0.0);
    assert!(comparisons[1].ai_insight.is_none());
  }
}
