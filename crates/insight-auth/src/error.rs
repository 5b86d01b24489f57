//! Error types for `insight-auth`.
//!
//! Credential and validation failures carry the Japanese user-facing
//! messages shown by clients; internal failures keep technical messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Deliberately identical for unknown email and wrong password.
  #[error("メールアドレスまたはパスワードが正しくありません。")]
  InvalidCredentials,

  #[error("このアカウントは現在無効になっています。管理者にお問い合わせください。")]
  AccountDisabled,

  #[error("このメールアドレスは既に登録されています。")]
  EmailTaken,

  #[error("パスワードが一致しません。")]
  PasswordMismatch,

  #[error("{0}")]
  Validation(String),

  #[error("無効なトークンです。")]
  InvalidToken,

  #[error("password hash error: {0}")]
  Hash(String),

  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
