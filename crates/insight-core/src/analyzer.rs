//! The insight analyzer — keyword-overlap scoring, category
//! strength/weakness classification, and the heuristic point generator used
//! by the offline training mode.
//!
//! Everything in this module is pure and synchronous; safe to call
//! concurrently with no shared state.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
  article::Article,
  insight::{
    AnalysisLevel, InsightAnalysis, InsightCategory, InsightPoint,
    UserInsight, NAMED_CATEGORIES,
  },
};

// ─── Keyword extraction ──────────────────────────────────────────────────────

/// Japanese function words excluded from keyword sets.
const STOP_WORDS: [&str; 14] = [
  "の", "に", "は", "を", "が", "と", "で", "た", "し", "て", "です",
  "ます", "ない", "ある",
];

/// Split `text` into keyword tokens: lower-cased, delimited by whitespace and
/// the Japanese punctuation 、 and 。, with one-character tokens and stop
/// words discarded.
pub fn extract_keywords(text: &str) -> Vec<String> {
  text
    .to_lowercase()
    .split(|c: char| c.is_whitespace() || c == '、' || c == '。')
    .filter(|w| w.chars().count() > 1 && !STOP_WORDS.contains(w))
    .map(str::to_owned)
    .collect()
}

// ─── Match scorer ────────────────────────────────────────────────────────────

/// Score how well a set of user-written insight descriptions aligns with a
/// set of AI insight points, as an integer in [0, 100].
///
/// This is a keyword-overlap heuristic, not a semantic similarity measure:
/// tokens match on asymmetric substring containment, and a single user
/// insight can accrue fractional credit against several AI insights rather
/// than being matched one-to-one. Returns 0 when either input is empty.
pub fn compare_insights(
  user_insights: &[String],
  ai_insights: &[InsightPoint],
) -> u8 {
  if user_insights.is_empty() || ai_insights.is_empty() {
    return 0;
  }

  let ai_keyword_sets: Vec<Vec<String>> = ai_insights
    .iter()
    .map(|p| extract_keywords(&format!("{} {}", p.title, p.description)))
    .collect();

  let mut match_count = 0.0_f64;

  for user_insight in user_insights {
    let user_keywords = extract_keywords(user_insight);
    if user_keywords.is_empty() {
      continue;
    }

    for ai_keywords in &ai_keyword_sets {
      let matching = user_keywords
        .iter()
        .filter(|kw| {
          ai_keywords
            .iter()
            .any(|ai_kw| ai_kw.contains(kw.as_str()) || kw.contains(ai_kw))
        })
        .count();

      if matching > 0 {
        let larger = user_keywords.len().max(ai_keywords.len());
        match_count += matching as f64 / larger as f64;
      }
    }
  }

  let max_possible = user_insights.len().min(ai_insights.len()) as f64;
  let score = (match_count / max_possible) * 100.0;

  score.round().min(100.0) as u8
}

// ─── Category classifier ─────────────────────────────────────────────────────

/// Strength/weakness classification across the named categories.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CategoryBreakdown {
  pub strengths:  Vec<InsightCategory>,
  pub weaknesses: Vec<InsightCategory>,
}

/// Count user insights per category.
pub fn count_user_categories(
  insights: &[UserInsight],
) -> HashMap<InsightCategory, u64> {
  let mut counts = HashMap::new();
  for insight in insights {
    *counts.entry(insight.category).or_insert(0) += 1;
  }
  counts
}

/// Count AI insight points per category.
pub fn count_point_categories(
  points: &[InsightPoint],
) -> HashMap<InsightCategory, u64> {
  let mut counts = HashMap::new();
  for point in points {
    *counts.entry(point.category).or_insert(0) += 1;
  }
  counts
}

/// Classify each named category as a strength or weakness by the ratio of
/// user coverage to AI coverage.
///
/// Categories the AI never raised are skipped entirely. `ratio >= 0.8` is a
/// strength, `ratio <= 0.3` a weakness (both boundaries inclusive); anything
/// in between is neither. [`InsightCategory::Other`] never appears.
pub fn classify_categories(
  user_counts: &HashMap<InsightCategory, u64>,
  ai_counts: &HashMap<InsightCategory, u64>,
) -> CategoryBreakdown {
  let mut breakdown = CategoryBreakdown::default();

  for category in NAMED_CATEGORIES {
    let ai_count = ai_counts.get(&category).copied().unwrap_or(0);
    if ai_count == 0 {
      continue;
    }
    let user_count = user_counts.get(&category).copied().unwrap_or(0);
    let ratio = user_count as f64 / ai_count as f64;

    if ratio >= 0.8 {
      breakdown.strengths.push(category);
    } else if ratio <= 0.3 {
      breakdown.weaknesses.push(category);
    }
  }

  breakdown
}

// ─── Recommendations ─────────────────────────────────────────────────────────

/// Canned training advice for a weakness in `category`.
fn category_recommendation(category: InsightCategory) -> Option<&'static str> {
  match category {
    InsightCategory::HiddenAssumption => Some(
      "文章の隠れた前提条件を見つける練習をしましょう。「この主張が成り立つためには何が前提となっているか？」と自問してみてください。",
    ),
    InsightCategory::Causality => Some(
      "因果関係の分析を強化するために、「なぜ？」という質問を繰り返し、根本原因を探る習慣をつけましょう。",
    ),
    InsightCategory::Contradiction => Some(
      "文章内の矛盾点を見つけるために、主張同士の整合性をチェックする習慣をつけましょう。",
    ),
    InsightCategory::DataInterpretation => Some(
      "データの解釈方法を学ぶために、統計の基本概念や一般的な誤用パターンについて学習することをお勧めします。",
    ),
    InsightCategory::AuthorBias => Some(
      "著者のバイアスを見抜くために、著者の背景や立場を考慮し、別の視点からも情報を検証する習慣をつけましょう。",
    ),
    InsightCategory::IndustryTrend => Some(
      "業界トレンドとの関連性を理解するために、関連分野の最新動向をフォローし、歴史的な文脈も考慮しましょう。",
    ),
    InsightCategory::Other => None,
  }
}

/// Fixed recommendation text driven by the overall match score and the
/// weakness list — a lookup table, not generated content.
pub fn recommendations(
  match_score: u8,
  weaknesses: &[InsightCategory],
) -> Vec<String> {
  let mut recs = Vec::new();

  let overall = if match_score >= 80 {
    "あなたは優れた洞察力を持っています。さらに専門的な記事に挑戦してみましょう。"
  } else if match_score >= 50 {
    "良い洞察力です。より多角的な視点を持つことで、洞察力をさらに向上させることができます。"
  } else {
    "基本的な洞察のパターンを学ぶことで、重要なポイントを見逃さないようになります。"
  };
  recs.push(overall.to_owned());

  for category in weaknesses {
    if let Some(rec) = category_recommendation(*category) {
      recs.push(rec.to_owned());
    }
  }

  recs
}

// ─── Heuristic analysis ──────────────────────────────────────────────────────

/// Run the heuristic analyzer over `article` at `level`.
///
/// Point generation is template-driven: the article's category string picks
/// a pair of base templates, and higher levels append further points. Used
/// by the offline training mode when no AI analysis is wanted.
pub fn analyze_article(article: &Article, level: AnalysisLevel) -> InsightAnalysis {
  let insights = generate_heuristic_points(article, level);
  let summary = analysis_summary(article, &insights);

  InsightAnalysis {
    id: Uuid::new_v4(),
    article_id: article.id,
    insights,
    summary,
    level,
    created_at: Utc::now(),
  }
}

fn generate_heuristic_points(
  article: &Article,
  level: AnalysisLevel,
) -> Vec<InsightPoint> {
  let mut points = Vec::new();
  let id = article.id;

  match article.category.as_deref() {
    Some("テクノロジー") => {
      points.push(InsightPoint::new(
        id,
        InsightCategory::HiddenAssumption,
        "技術的実現可能性の前提",
        "記事は技術の進歩が現在のペースで継続することを前提としていますが、技術的障壁や規制の変化によってこのペースが変わる可能性があります。",
        4,
      ));
      points.push(InsightPoint::new(
        id,
        InsightCategory::IndustryTrend,
        "競合技術の動向",
        "記事で紹介されている技術以外にも、同じ問題を解決するための競合技術が存在する可能性があります。業界全体の動向を考慮する必要があります。",
        3,
      ));
    }
    Some("環境") => {
      points.push(InsightPoint::new(
        id,
        InsightCategory::AuthorBias,
        "環境保護寄りの視点",
        "著者は環境保護の観点から議論を展開しており、経済的影響や実現可能性についての懸念が十分に考慮されていない可能性があります。",
        4,
      ));
      points.push(InsightPoint::new(
        id,
        InsightCategory::DataInterpretation,
        "統計データの選択的使用",
        "記事で引用されているデータは特定の主張を支持するために選択的に使用されている可能性があります。より包括的なデータセットを考慮する必要があります。",
        5,
      ));
    }
    Some("経済") => {
      points.push(InsightPoint::new(
        id,
        InsightCategory::Causality,
        "相関と因果の混同",
        "記事では特定の経済指標の変化と政策の関係について因果関係を示唆していますが、これは相関関係である可能性があります。他の要因の影響も考慮すべきです。",
        5,
      ));
      points.push(InsightPoint::new(
        id,
        InsightCategory::Contradiction,
        "短期的影響と長期的影響の矛盾",
        "記事は短期的な経済効果を強調していますが、長期的な影響については異なる結論になる可能性があります。この潜在的な矛盾に注意すべきです。",
        4,
      ));
    }
    _ => {
      points.push(InsightPoint::new(
        id,
        InsightCategory::HiddenAssumption,
        "一般的な前提条件",
        "記事には明示されていない前提条件があります。これらの前提が変わると、結論も変わる可能性があります。",
        3,
      ));
      points.push(InsightPoint::new(
        id,
        InsightCategory::AuthorBias,
        "著者の視点",
        "著者の背景や専門分野が記事の内容や結論に影響を与えている可能性があります。",
        3,
      ));
    }
  }

  if matches!(level, AnalysisLevel::Intermediate | AnalysisLevel::Advanced) {
    points.push(InsightPoint::new(
      id,
      InsightCategory::DataInterpretation,
      "データソースの信頼性",
      "記事で引用されているデータソースの信頼性や方法論について検討する必要があります。",
      4,
    ));
  }

  if level == AnalysisLevel::Advanced {
    points.push(InsightPoint::new(
      id,
      InsightCategory::IndustryTrend,
      "歴史的文脈での位置づけ",
      "現在の状況を歴史的な業界の発展パターンの中で位置づけることで、将来の展開についての洞察が得られます。",
      5,
    ));
  }

  points
}

/// Build the free-text summary shown alongside a heuristic analysis.
fn analysis_summary(article: &Article, insights: &[InsightPoint]) -> String {
  // Per-category counts in first-seen order.
  let mut counts: Vec<(InsightCategory, usize)> = Vec::new();
  for point in insights {
    match counts.iter_mut().find(|(c, _)| *c == point.category) {
      Some((_, n)) => *n += 1,
      None => counts.push((point.category, 1)),
    }
  }

  let category_text = counts
    .iter()
    .map(|(c, n)| format!("{}({n})", c.label()))
    .collect::<Vec<_>>()
    .join("、");

  format!(
    "この記事「{}」の分析では、{}個の洞察ポイントが特定されました。主な洞察カテゴリーは{}です。これらのポイントを理解することで、記事の内容をより批判的に評価し、隠れた前提や著者のバイアスを認識することができます。",
    article.title,
    insights.len(),
    category_text,
  )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn point(category: InsightCategory, title: &str, description: &str) -> InsightPoint {
    InsightPoint::new(Uuid::new_v4(), category, title, description, 3)
  }

  fn user_insight(category: InsightCategory, description: &str) -> UserInsight {
    let now = Utc::now();
    UserInsight {
      id: Uuid::new_v4(),
      category,
      description: description.to_owned(),
      excerpt: None,
      created_at: now,
      updated_at: now,
    }
  }

  // ── Keyword extraction ──────────────────────────────────────────────────

  #[test]
  fn keywords_drop_short_tokens_and_stop_words() {
    let kw = extract_keywords("データ の 解釈 は 難しい a");
    assert_eq!(kw, vec!["データ", "解釈", "難しい"]);
  }

  #[test]
  fn keywords_split_on_japanese_punctuation() {
    let kw = extract_keywords("前提条件、データ解釈。結論");
    assert_eq!(kw, vec!["前提条件", "データ解釈", "結論"]);
  }

  // ── Match scorer ────────────────────────────────────────────────────────

  #[test]
  fn empty_user_insights_score_zero() {
    let ai = vec![point(InsightCategory::Causality, "因果関係", "経済指標の因果")];
    assert_eq!(compare_insights(&[], &ai), 0);
  }

  #[test]
  fn empty_ai_insights_score_zero() {
    let user = vec!["因果関係についての指摘".to_owned()];
    assert_eq!(compare_insights(&user, &[]), 0);
  }

  #[test]
  fn score_is_bounded() {
    // Identical wording repeated across several pairs can over-credit;
    // the result must still clamp into [0, 100].
    let user = vec![
      "技術 進歩 規制".to_owned(),
      "技術 進歩 規制".to_owned(),
      "技術 進歩 規制".to_owned(),
    ];
    let ai = vec![
      point(InsightCategory::HiddenAssumption, "技術", "進歩 規制"),
      point(InsightCategory::IndustryTrend, "技術", "進歩 規制"),
      point(InsightCategory::Causality, "技術", "進歩 規制"),
    ];
    let score = compare_insights(&user, &ai);
    assert!(score <= 100);
    assert!(score > 0);
  }

  #[test]
  fn shared_substring_tokens_score_nonzero() {
    // The worked example: 前提 and 条件 overlap via substring containment.
    let user = vec!["隠れた前提条件についての指摘".to_owned()];
    let ai = vec![point(
      InsightCategory::HiddenAssumption,
      "前提条件",
      "記事の前提",
    )];
    assert!(compare_insights(&user, &ai) > 0);
  }

  #[test]
  fn disjoint_vocabulary_scores_zero() {
    let user = vec!["りんご みかん".to_owned()];
    let ai = vec![point(InsightCategory::Causality, "経済指標", "政策の影響")];
    assert_eq!(compare_insights(&user, &ai), 0);
  }

  #[test]
  fn more_overlap_scores_higher() {
    let ai = vec![point(
      InsightCategory::DataInterpretation,
      "統計データ 解釈 妥当性",
      "引用データ 選択的 使用",
    )];
    let little = compare_insights(&["統計データ ほかの話題".to_owned()], &ai);
    let lots = compare_insights(
      &["統計データ 解釈 妥当性 選択的 使用".to_owned()],
      &ai,
    );
    assert!(lots >= little);
    assert!(lots > 0);
  }

  // ── Classifier ──────────────────────────────────────────────────────────

  fn counts(pairs: &[(InsightCategory, u64)]) -> HashMap<InsightCategory, u64> {
    pairs.iter().copied().collect()
  }

  #[test]
  fn classifier_skips_categories_without_ai_points() {
    let user = counts(&[(InsightCategory::Causality, 3)]);
    let ai = HashMap::new();
    let breakdown = classify_categories(&user, &ai);
    assert!(breakdown.strengths.is_empty());
    assert!(breakdown.weaknesses.is_empty());
  }

  #[test]
  fn ratio_exactly_point_eight_is_a_strength() {
    let user = counts(&[(InsightCategory::AuthorBias, 4)]);
    let ai = counts(&[(InsightCategory::AuthorBias, 5)]);
    let breakdown = classify_categories(&user, &ai);
    assert_eq!(breakdown.strengths, vec![InsightCategory::AuthorBias]);
  }

  #[test]
  fn ratio_exactly_point_three_is_a_weakness() {
    let user = counts(&[(InsightCategory::Contradiction, 3)]);
    let ai = counts(&[(InsightCategory::Contradiction, 10)]);
    let breakdown = classify_categories(&user, &ai);
    assert_eq!(breakdown.weaknesses, vec![InsightCategory::Contradiction]);
  }

  #[test]
  fn middling_ratio_is_neither() {
    let user = counts(&[(InsightCategory::Causality, 1)]);
    let ai = counts(&[(InsightCategory::Causality, 2)]);
    let breakdown = classify_categories(&user, &ai);
    assert!(breakdown.strengths.is_empty());
    assert!(breakdown.weaknesses.is_empty());
  }

  #[test]
  fn category_counts_from_insight_lists() {
    let user = vec![
      user_insight(InsightCategory::Causality, "a"),
      user_insight(InsightCategory::Causality, "b"),
      user_insight(InsightCategory::AuthorBias, "c"),
    ];
    let got = count_user_categories(&user);
    assert_eq!(got.get(&InsightCategory::Causality), Some(&2));
    assert_eq!(got.get(&InsightCategory::AuthorBias), Some(&1));
  }

  // ── Recommendations ─────────────────────────────────────────────────────

  #[test]
  fn recommendations_include_tier_and_weakness_lines() {
    let recs = recommendations(30, &[InsightCategory::Causality]);
    assert_eq!(recs.len(), 2);
    assert!(recs[1].contains("因果関係"));
  }

  #[test]
  fn other_category_yields_no_recommendation_line() {
    let recs = recommendations(90, &[InsightCategory::Other]);
    assert_eq!(recs.len(), 1);
  }

  // ── Heuristic analysis ──────────────────────────────────────────────────

  fn article(category: Option<&str>) -> Article {
    let now = Utc::now();
    Article {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      title: "テスト記事".to_owned(),
      content: "本文".to_owned(),
      url: None,
      author: None,
      source: None,
      category: category.map(str::to_owned),
      published_at: None,
      image_url: None,
      status: Default::default(),
      tags: vec![],
      reading_time: 1,
      insights: vec![],
      ai_insights: None,
      created_at: now,
      updated_at: now,
      analyzed_at: None,
    }
  }

  #[test]
  fn beginner_analysis_yields_two_points() {
    let analysis = analyze_article(&article(None), AnalysisLevel::Beginner);
    assert_eq!(analysis.insights.len(), 2);
    assert!(analysis.summary.contains("テスト記事"));
  }

  #[test]
  fn advanced_analysis_adds_level_points() {
    let analysis =
      analyze_article(&article(Some("経済")), AnalysisLevel::Advanced);
    assert_eq!(analysis.insights.len(), 4);
    assert!(analysis
      .insights
      .iter()
      .any(|p| p.category == InsightCategory::IndustryTrend));
  }

  #[test]
  fn points_inherit_the_article_id() {
    let a = article(Some("テクノロジー"));
    let analysis = analyze_article(&a, AnalysisLevel::Intermediate);
    assert!(analysis.insights.iter().all(|p| p.article_id == a.id));
  }
}
