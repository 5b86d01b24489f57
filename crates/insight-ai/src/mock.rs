//! Deterministic substitutes for when the LLM is unavailable.
//!
//! Handlers call these when [`crate::AiClient`] errors (no key, network
//! failure, unparseable reply). Neither function can fail.

use insight_core::insight::{
  InsightCategory, InsightComparison, InsightPoint, UserInsight,
};
use uuid::Uuid;

const FALLBACK_FEEDBACK: &str =
  "インサイトを深めるために、より具体的な例や証拠を追加することを検討してください。";

/// A fixed three-point placeholder analysis.
pub fn fallback_insights(article_id: Uuid) -> Vec<InsightPoint> {
  let specs: [(InsightCategory, &str, &str, &str, u8); 3] = [
    (
      InsightCategory::HiddenAssumption,
      "議論の前提を確認する",
      "記事の主張が暗黙のうちに依拠している前提条件に注目してください。",
      "記事全体の文脈から導き出されています。",
      4,
    ),
    (
      InsightCategory::DataInterpretation,
      "データの扱いを確認する",
      "提示されたデータや統計がどのように解釈されているかを検証してください。",
      "記事の特定の部分から抽出されています。",
      4,
    ),
    (
      InsightCategory::AuthorBias,
      "著者の立場を確認する",
      "著者の視点や立場が主張にどのような影響を与えているかを考えてください。",
      "記事の文脈と外部の知識から導き出されています。",
      3,
    ),
  ];

  specs
    .into_iter()
    .map(|(category, title, description, evidence, importance)| {
      let mut point =
        InsightPoint::new(article_id, category, title, description, importance);
      point.excerpt = Some(evidence.to_owned());
      point
    })
    .collect()
}

/// Category-match comparison heuristic: 0.5 when an AI point shares the
/// user insight's category, 0.3 otherwise.
pub fn simple_comparisons(
  user_insights: &[UserInsight],
  ai_insights: &[InsightPoint],
) -> Vec<InsightComparison> {
  user_insights
    .iter()
    .map(|user_insight| {
      let ai_insight = ai_insights
        .iter()
        .find(|ai| ai.category == user_insight.category)
        .cloned();
      let match_score = if ai_insight.is_some() { 0.5 } else { 0.3 };

      InsightComparison {
        user_insight: user_insight.clone(),
        ai_insight,
        match_score,
        feedback: FALLBACK_FEEDBACK.to_owned(),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  #[test]
  fn fallback_set_is_three_points_for_the_article() {
    let article_id = Uuid::new_v4();
    let points = fallback_insights(article_id);

    assert_eq!(points.len(), 3);
    assert!(points.iter().all(|p| p.article_id == article_id));
    assert!(points.iter().all(|p| (1..=5).contains(&p.importance)));
  }

  #[test]
  fn simple_comparisons_score_by_category_match() {
    let article_id = Uuid::new_v4();
    let ais = vec![InsightPoint::new(
      article_id,
      InsightCategory::Causality,
      "t",
      "d",
      3,
    )];

    let matching = UserInsight {
      id:          Uuid::new_v4(),
      category:    InsightCategory::Causality,
      description: "因果関係の指摘".to_owned(),
      excerpt:     None,
      created_at:  Utc::now(),
      updated_at:  Utc::now(),
    };
    let mut non_matching = matching.clone();
    non_matching.category = InsightCategory::Contradiction;

    let comparisons = simple_comparisons(&[matching, non_matching], &ais);
    assert_eq!(comparisons[0].match_score, 0.5);
    assert!(comparisons[0].ai_insight.is_some());
    assert_eq!(comparisons[1].match_score, 0.3);
    assert!(comparisons[1].ai_insight.is_none());
  }
}
