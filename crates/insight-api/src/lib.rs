//! JSON REST API for InsightMaster.
//!
//! Exposes an axum [`Router`] backed by any
//! [`insight_core::store::InsightStore`]. TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", insight_api::api_router(state))
//! ```

pub mod analysis;
pub mod articles;
pub mod auth;
pub mod error;
pub mod extract;
pub mod insights;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use insight_ai::{AiClient, AiConfig};
use insight_auth::AuthService;
use insight_core::store::InsightStore;
use serde::Deserialize;
use serde_json::{Value, json};

pub use error::ApiError;
pub use extract::CurrentUser;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `INSIGHT_`-prefixed environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub jwt_secret: String,
  #[serde(default = "default_token_ttl_days")]
  pub token_ttl_days: i64,
  /// Adds the `Secure` attribute to the session cookie.
  #[serde(default)]
  pub secure_cookies: bool,
  #[serde(default)]
  pub openai: AiConfig,
}

fn default_token_ttl_days() -> i64 { 7 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub auth:   Arc<AuthService<S>>,
  pub ai:     Arc<AiClient>,
  pub config: Arc<ServerConfig>,
}

// Manual impl; `S` itself need not be `Clone` behind the `Arc`s.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      auth:   self.auth.clone(),
      ai:     self.ai.clone(),
      config: self.config.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: InsightStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Auth
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/validate", get(auth::validate::<S>))
    // Articles
    .route("/articles", get(articles::list::<S>).post(articles::create::<S>))
    .route(
      "/articles/{id}",
      get(articles::get_one::<S>)
        .put(articles::update::<S>)
        .delete(articles::delete::<S>),
    )
    // Embedded insights
    .route("/articles/{id}/insights", post(insights::create::<S>))
    .route(
      "/articles/{id}/insights/{insight_id}",
      put(insights::update::<S>).delete(insights::delete::<S>),
    )
    // Analysis and comparison
    .route(
      "/articles/{id}/analyze",
      post(analysis::analyze::<S>).get(analysis::status::<S>),
    )
    .route("/articles/{id}/compare", post(analysis::compare::<S>))
    .route("/ai/generate-insights", post(analysis::generate::<S>))
    // Account
    .route("/users/me", get(users::me::<S>).patch(users::update_me::<S>))
    .route("/users/me/password", put(users::change_password::<S>))
    .route("/users/me/stats", get(users::stats::<S>))
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}
