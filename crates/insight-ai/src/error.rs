//! Error types for `insight-ai`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No API key was configured. Callers decide whether to fall back to
  /// the deterministic mock set or surface the error.
  #[error("no API key configured")]
  NotConfigured,

  #[error("request failed: {0}")]
  Network(#[from] reqwest::Error),

  #[error("API error ({status}): {body}")]
  Api { status: u16, body: String },

  #[error("could not parse model response: {0}")]
  Parse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
