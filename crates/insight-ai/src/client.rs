//! The chat-completions client.

use insight_core::{
  article::Article,
  insight::{AnalysisLevel, InsightComparison, InsightPoint, UserInsight},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{parse, prompt, Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Client configuration. A `None` api_key means every call returns
/// [`Error::NotConfigured`].
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
  #[serde(default)]
  pub api_key:  Option<String>,
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_model")]
  pub model:    String,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }
fn default_model() -> String { DEFAULT_MODEL.to_owned() }

impl Default for AiConfig {
  fn default() -> Self {
    Self {
      api_key:  None,
      base_url: default_base_url(),
      model:    default_model(),
    }
  }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    [ChatMessage<'a>; 2],
  temperature: f64,
  max_tokens:  u32,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
  content: String,
}

/// Generates and compares insights via an OpenAI-compatible
/// chat-completions endpoint.
#[derive(Clone)]
pub struct AiClient {
  http:   reqwest::Client,
  config: AiConfig,
}

impl AiClient {
  pub fn new(config: AiConfig) -> Self {
    Self { http: reqwest::Client::new(), config }
  }

  pub fn is_configured(&self) -> bool { self.config.api_key.is_some() }

  async fn chat(&self, user_prompt: &str) -> Result<String> {
    let Some(api_key) = self.config.api_key.as_deref() else {
      return Err(Error::NotConfigured);
    };

    let request = ChatRequest {
      model:       &self.config.model,
      messages:    [
        ChatMessage { role: "system", content: prompt::SYSTEM_PROMPT },
        ChatMessage { role: "user", content: user_prompt },
      ],
      temperature: 0.3,
      max_tokens:  2000,
    };

    let response = self
      .http
      .post(format!("{}/chat/completions", self.config.base_url))
      .bearer_auth(api_key)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(status = %status, "chat completion failed");
      return Err(Error::Api { status: status.as_u16(), body });
    }

    let chat: ChatResponse =
      response.json().await.map_err(|e| Error::Parse(e.to_string()))?;
    chat
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or_else(|| Error::Parse("empty choices".to_owned()))
  }

  /// Generate insight points for an article. Point count follows the
  /// analysis level (3 / 5 / 7); `guidance` is optional extra direction
  /// appended to the prompt.
  pub async fn generate_insights(
    &self,
    article: &Article,
    level: AnalysisLevel,
    guidance: Option<&str>,
  ) -> Result<Vec<InsightPoint>> {
    let reply = self
      .chat(&prompt::analysis_prompt(article, level, guidance))
      .await?;
    debug!(article_id = %article.id, "parsing generated insights");
    parse::parse_points(&reply, article.id)
  }

  /// Match each user insight against the AI set, with per-pair scores
  /// and feedback.
  pub async fn compare_insights(
    &self,
    user_insights: &[UserInsight],
    ai_insights: &[InsightPoint],
  ) -> Result<Vec<InsightComparison>> {
    let reply = self
      .chat(&prompt::comparison_prompt(user_insights, ai_insights))
      .await?;
    parse::parse_comparisons(&reply, user_insights, ai_insights)
  }
}
