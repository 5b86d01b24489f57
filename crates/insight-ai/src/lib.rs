//! LLM-backed insight generation and comparison.
//!
//! [`AiClient`] talks to an OpenAI-compatible chat-completions endpoint
//! with Japanese prompts and defensively parses the replies. When no API
//! key is configured every call returns [`Error::NotConfigured`]; callers
//! that want graceful degradation use the deterministic substitutes in
//! [`mock`].

mod client;
mod parse;
mod prompt;

pub mod error;
pub mod mock;

pub use client::{AiClient, AiConfig};
pub use error::{Error, Result};
