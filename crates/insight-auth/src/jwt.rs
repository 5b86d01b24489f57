//! JWT issuance and verification (HS256).

use chrono::{Duration, Utc};
use insight_core::user::PublicUser;
use jsonwebtoken::{
  decode, encode, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Claims carried by an InsightMaster session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// Subject — the user id as a string.
  pub sub:  String,
  /// The sanitized user the token was issued for.
  pub user: PublicUser,
  pub exp:  i64,
  pub iat:  i64,
}

/// Creates and verifies session tokens.
#[derive(Clone)]
pub struct JwtService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl:          Duration,
}

impl JwtService {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }

  /// Token lifetime; also used for the session cookie's Max-Age.
  pub fn ttl(&self) -> Duration { self.ttl }

  /// Issue a token for `user`, expiring after the configured lifetime.
  pub fn issue(&self, user: &PublicUser) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
      sub:  user.id.to_string(),
      user: user.clone(),
      exp:  (now + self.ttl).timestamp(),
      iat:  now.timestamp(),
    };
    Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
  }

  /// Verify signature and expiry; returns the decoded claims.
  pub fn verify(&self, token: &str) -> Result<Claims> {
    let data =
      decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
    Ok(data.claims)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use insight_core::user::{UserRole, UserStatus};
  use uuid::Uuid;

  fn user() -> PublicUser {
    PublicUser {
      id:                Uuid::new_v4(),
      name:              "Alice".to_owned(),
      email:             "alice@example.com".to_owned(),
      role:              UserRole::User,
      status:            UserStatus::Active,
      profile_image_url: None,
      bio:               None,
    }
  }

  #[test]
  fn issue_and_verify_round_trip() {
    let svc = JwtService::new("test-secret", Duration::days(7));
    let u = user();

    let token = svc.issue(&u).unwrap();
    let claims = svc.verify(&token).unwrap();

    assert_eq!(claims.sub, u.id.to_string());
    assert_eq!(claims.user.email, u.email);
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn garbage_token_is_rejected() {
    let svc = JwtService::new("test-secret", Duration::days(7));
    assert!(svc.verify("not.a.token").is_err());
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let a = JwtService::new("secret-a", Duration::days(7));
    let b = JwtService::new("secret-b", Duration::days(7));

    let token = a.issue(&user()).unwrap();
    assert!(b.verify(&token).is_err());
  }

  #[test]
  fn expired_token_is_rejected() {
    // Negative lifetime puts `exp` in the past immediately.
    let svc = JwtService::new("test-secret", Duration::days(-1));
    let token = svc.issue(&user()).unwrap();
    assert!(svc.verify(&token).is_err());
  }
}
