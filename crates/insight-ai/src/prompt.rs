//! Prompt construction.
//!
//! All prompts are Japanese and ask for strict JSON so [`crate::parse`]
//! can extract the payload even when the model wraps it in prose.

use std::fmt::Write;

use insight_core::{
  article::Article,
  insight::{AnalysisLevel, InsightPoint, UserInsight, NAMED_CATEGORIES},
};

pub const SYSTEM_PROMPT: &str =
  "あなたは優れた批判的思考と分析能力を持つAIアシスタントです。";

fn level_instruction(level: AnalysisLevel) -> &'static str {
  match level {
    AnalysisLevel::Beginner => {
      "基本的な分析を行い、主要な考えや重要な点を特定してください。"
    }
    AnalysisLevel::Intermediate => {
      "詳細な分析を行い、主要な考えだけでなく、裏付け証拠、反論点、意味合いなども特定してください。"
    }
    AnalysisLevel::Advanced => {
      "専門家レベルの深い分析を行い、多角的な視点から分析してください。"
    }
  }
}

/// The user prompt for an article analysis pass. `guidance` is optional
/// extra direction from the caller, appended verbatim.
pub fn analysis_prompt(
  article: &Article,
  level: AnalysisLevel,
  guidance: Option<&str>,
) -> String {
  let categories = NAMED_CATEGORIES
    .iter()
    .map(|c| format!("{}（{}）", c.as_str(), c.label()))
    .collect::<Vec<_>>()
    .join(", ");

  let guidance = guidance
    .map(|g| format!("\n補足指示: {g}\n"))
    .unwrap_or_default();

  format!(
    "以下の記事を読み、{instruction}\n{guidance}\n\
     記事タイトル: {title}\n\
     記事内容:\n{content}\n\n\
     {count}個のインサイトを抽出し、各インサイトに以下の情報を含めてください：\n\
     1. タイトル（指摘を一言で）\n\
     2. 説明（明確かつ簡潔に）\n\
     3. カテゴリ（{categories} のいずれか）\n\
     4. 裏付け証拠（記事中の関連する部分や引用）\n\
     5. 重要度（1-5の整数で、このインサイトが記事の理解にどれだけ重要か）\n\n\
     JSON形式で回答してください。例：\n\
     [\n  {{\n    \"title\": \"タイトルをここに記述\",\n    \
     \"description\": \"説明をここに記述\",\n    \
     \"category\": \"hidden_assumption\",\n    \
     \"evidence\": \"裏付け証拠をここに記述\",\n    \
     \"importance\": 4\n  }}\n]\n",
    instruction = level_instruction(level),
    guidance = guidance,
    title = article.title,
    content = article.content,
    count = level.point_count(),
    categories = categories,
  )
}

/// The user prompt for a user-vs-AI insight comparison pass.
pub fn comparison_prompt(
  user_insights: &[UserInsight],
  ai_insights: &[InsightPoint],
) -> String {
  let mut user_lines = String::new();
  for (i, insight) in user_insights.iter().enumerate() {
    let _ = writeln!(
      user_lines,
      "{}. カテゴリ: {}, 内容: {}",
      i + 1,
      insight.category.label(),
      insight.description
    );
  }

  let mut ai_lines = String::new();
  for (i, point) in ai_insights.iter().enumerate() {
    let _ = writeln!(
      ai_lines,
      "{}. カテゴリ: {}, 内容: {}, 重要度: {}",
      i + 1,
      point.category.label(),
      point.description,
      point.importance
    );
  }

  format!(
    "ユーザーが抽出したインサイトと、AIが抽出したインサイトを比較し、\
     それぞれの類似度を評価してください。\n\n\
     ユーザーのインサイト:\n{user_lines}\n\
     AIのインサイト:\n{ai_lines}\n\
     各ユーザーインサイトについて、最も類似したAIインサイトを特定し、\
     以下の情報を含むJSONを生成してください：\n\
     1. ユーザーインサイトのインデックス（0始まり）\n\
     2. 最も類似したAIインサイトのインデックス（0始まり、類似したものがない場合はnull）\n\
     3. マッチスコア（0.0-1.0の範囲、類似性の度合い）\n\
     4. フィードバック（ユーザーのインサイトを改善するための具体的なアドバイス）\n\n\
     JSON形式で回答してください。例：\n\
     [\n  {{\n    \"user_insight_index\": 0,\n    \
     \"ai_insight_index\": 2,\n    \
     \"match_score\": 0.85,\n    \
     \"feedback\": \"フィードバック内容をここに記述\"\n  }}\n]\n"
  )
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn analysis_prompt_mentions_count_and_categories() {
    let article = Article {
      id:           Uuid::new_v4(),
      user_id:      Uuid::new_v4(),
      title:        "テスト記事".to_owned(),
      content:      "本文".to_owned(),
      url:          None,
      author:       None,
      source:       None,
      category:     None,
      published_at: None,
      image_url:    None,
      status:       Default::default(),
      tags:         vec![],
      reading_time: 1,
      insights:     vec![],
      ai_insights:  None,
      created_at:   chrono::Utc::now(),
      updated_at:   chrono::Utc::now(),
      analyzed_at:  None,
    };

    let prompt = analysis_prompt(&article, AnalysisLevel::Advanced, None);
    assert!(prompt.contains("7個のインサイト"));
    assert!(prompt.contains("hidden_assumption"));
    assert!(prompt.contains("テスト記事"));

    let guided = analysis_prompt(
      &article,
      AnalysisLevel::Beginner,
      Some("経済面に注目してください"),
    );
    assert!(guided.contains("補足指示: 経済面に注目してください"));
  }
}
