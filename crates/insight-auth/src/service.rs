//! The account service: register, login, token validation, password change.

use std::sync::{Arc, LazyLock};

use chrono::Duration;
use insight_core::{
  store::InsightStore,
  user::{NewUser, PublicUser, User, UserUpdate},
};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  jwt::JwtService,
  password::{hash_password, verify_password},
  Error, Result,
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

const MIN_PASSWORD_LEN: usize = 8;

/// Successful register/login payload: the session token plus the
/// password-free user it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
  pub token: String,
  pub user:  PublicUser,
}

/// Account operations on top of any [`InsightStore`].
pub struct AuthService<S> {
  store: Arc<S>,
  jwt:   JwtService,
}

impl<S: InsightStore> AuthService<S> {
  pub fn new(store: Arc<S>, jwt: JwtService) -> Self { Self { store, jwt } }

  /// Token (and session cookie) lifetime.
  pub fn token_ttl(&self) -> Duration { self.jwt.ttl() }

  pub fn jwt(&self) -> &JwtService { &self.jwt }

  /// Register a new account and log it in.
  pub async fn register(
    &self,
    name: &str,
    email: &str,
    password: &str,
    password_confirm: &str,
  ) -> Result<AuthResponse> {
    let name = name.trim();
    let email = email.trim().to_lowercase();

    if name.is_empty() {
      return Err(Error::Validation("名前を入力してください。".to_owned()));
    }
    if !EMAIL_RE.is_match(&email) {
      return Err(Error::Validation(
        "有効なメールアドレスを入力してください。".to_owned(),
      ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
      return Err(Error::Validation(
        "パスワードは8文字以上で入力してください。".to_owned(),
      ));
    }
    if password != password_confirm {
      return Err(Error::PasswordMismatch);
    }

    if self
      .store
      .find_user_by_email(&email)
      .await
      .map_err(Error::store)?
      .is_some()
    {
      return Err(Error::EmailTaken);
    }

    let password_hash = hash_password(password)?;
    let user = self
      .store
      .create_user(NewUser {
        name: name.to_owned(),
        email,
        password_hash,
      })
      .await
      .map_err(Error::store)?;

    self.issue_response(&user)
  }

  /// Log in with email and password.
  ///
  /// Unknown email and wrong password produce the same error, so callers
  /// cannot probe which addresses are registered.
  pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
    let email = email.trim().to_lowercase();
    let Some(user) = self
      .store
      .find_user_by_email(&email)
      .await
      .map_err(Error::store)?
    else {
      return Err(Error::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
      return Err(Error::InvalidCredentials);
    }
    if !user.is_active() {
      return Err(Error::AccountDisabled);
    }

    self
      .store
      .touch_last_login(user.id)
      .await
      .map_err(Error::store)?;

    self.issue_response(&user)
  }

  /// Verify a token and re-load its user from the store.
  ///
  /// Re-loading means a token issued before a deactivation or deletion
  /// stops working immediately.
  pub async fn validate(&self, token: &str) -> Result<PublicUser> {
    let claims = self.jwt.verify(token).map_err(|_| Error::InvalidToken)?;
    let id: Uuid = claims.sub.parse().map_err(|_| Error::InvalidToken)?;

    let Some(user) = self.store.get_user(id).await.map_err(Error::store)? else {
      return Err(Error::InvalidToken);
    };
    if !user.is_active() {
      return Err(Error::AccountDisabled);
    }

    Ok(PublicUser::from(&user))
  }

  /// Change a user's password after verifying the current one.
  pub async fn change_password(
    &self,
    user_id: Uuid,
    current: &str,
    new: &str,
  ) -> Result<()> {
    let Some(user) = self.store.get_user(user_id).await.map_err(Error::store)?
    else {
      return Err(Error::InvalidCredentials);
    };
    if !verify_password(current, &user.password_hash) {
      return Err(Error::InvalidCredentials);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
      return Err(Error::Validation(
        "パスワードは8文字以上で入力してください。".to_owned(),
      ));
    }

    let password_hash = hash_password(new)?;
    self
      .store
      .update_user(user_id, UserUpdate {
        password_hash: Some(password_hash),
        ..UserUpdate::default()
      })
      .await
      .map_err(Error::store)?;

    Ok(())
  }

  fn issue_response(&self, user: &User) -> Result<AuthResponse> {
    let public = PublicUser::from(user);
    let token = self.jwt.issue(&public)?;
    Ok(AuthResponse { token, user: public })
  }
}

#[cfg(test)]
mod tests {
  use insight_store_sqlite::SqliteStore;

  use super::*;

  async fn service() -> AuthService<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AuthService::new(
      Arc::new(store),
      JwtService::new("test-secret", Duration::days(7)),
    )
  }

  #[tokio::test]
  async fn register_then_login() {
    let svc = service().await;

    let reg = svc
      .register("Taro", "taro@example.com", "password123", "password123")
      .await
      .unwrap();
    assert_eq!(reg.user.email, "taro@example.com");

    let login = svc.login("taro@example.com", "password123").await.unwrap();
    assert_eq!(login.user.id, reg.user.id);
  }

  #[tokio::test]
  async fn register_normalizes_email_case() {
    let svc = service().await;
    let reg = svc
      .register("Taro", "  Taro@Example.COM ", "password123", "password123")
      .await
      .unwrap();
    assert_eq!(reg.user.email, "taro@example.com");

    // Login with a differently-cased address still works.
    svc.login("TARO@example.com", "password123").await.unwrap();
  }

  #[tokio::test]
  async fn register_rejects_bad_input() {
    let svc = service().await;

    let short = svc
      .register("Taro", "taro@example.com", "short", "short")
      .await;
    assert!(matches!(short, Err(Error::Validation(_))));

    let mismatch = svc
      .register("Taro", "taro@example.com", "password123", "password124")
      .await;
    assert!(matches!(mismatch, Err(Error::PasswordMismatch)));

    let bad_email = svc
      .register("Taro", "not-an-email", "password123", "password123")
      .await;
    assert!(matches!(bad_email, Err(Error::Validation(_))));
  }

  #[tokio::test]
  async fn duplicate_email_is_rejected() {
    let svc = service().await;
    svc
      .register("Taro", "taro@example.com", "password123", "password123")
      .await
      .unwrap();

    let dup = svc
      .register("Jiro", "taro@example.com", "password456", "password456")
      .await;
    assert!(matches!(dup, Err(Error::EmailTaken)));
  }

  #[tokio::test]
  async fn login_failures_are_indistinguishable() {
    let svc = service().await;
    svc
      .register("Taro", "taro@example.com", "password123", "password123")
      .await
      .unwrap();

    let unknown = svc.login("nobody@example.com", "password123").await;
    let wrong = svc.login("taro@example.com", "wrong-password").await;

    assert!(matches!(unknown, Err(Error::InvalidCredentials)));
    assert!(matches!(wrong, Err(Error::InvalidCredentials)));
  }

  #[tokio::test]
  async fn validate_round_trips_the_token() {
    let svc = service().await;
    let reg = svc
      .register("Taro", "taro@example.com", "password123", "password123")
      .await
      .unwrap();

    let user = svc.validate(&reg.token).await.unwrap();
    assert_eq!(user.id, reg.user.id);

    assert!(matches!(
      svc.validate("garbage").await,
      Err(Error::InvalidToken)
    ));
  }

  #[tokio::test]
  async fn change_password_requires_current() {
    let svc = service().await;
    let reg = svc
      .register("Taro", "taro@example.com", "password123", "password123")
      .await
      .unwrap();

    let wrong = svc
      .change_password(reg.user.id, "not-current", "newpassword1")
      .await;
    assert!(matches!(wrong, Err(Error::InvalidCredentials)));

    svc
      .change_password(reg.user.id, "password123", "newpassword1")
      .await
      .unwrap();

    assert!(svc.login("taro@example.com", "password123").await.is_err());
    svc.login("taro@example.com", "newpassword1").await.unwrap();
  }
}
