//! User account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  #[default]
  User,
  Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
  #[default]
  Active,
  Inactive,
  Suspended,
}

/// A registered account. The argon2 PHC string never leaves the store layer;
/// handlers expose users only as [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:                Uuid,
  pub name:              String,
  pub email:             String,
  pub password_hash:     String,
  pub role:              UserRole,
  pub status:            UserStatus,
  pub profile_image_url: Option<String>,
  pub bio:               Option<String>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
  pub last_login_at:     Option<DateTime<Utc>>,
}

impl User {
  pub fn is_active(&self) -> bool { self.status == UserStatus::Active }
}

/// Input to [`crate::store::InsightStore::create_user`]. The password is
/// already hashed by the time it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

/// Partial account update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
  pub name:              Option<String>,
  pub email:             Option<String>,
  pub password_hash:     Option<String>,
  pub profile_image_url: Option<String>,
  pub bio:               Option<String>,
}

/// The password-free projection of a [`User`] returned by the API and
/// embedded in JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
  pub id:                Uuid,
  pub name:              String,
  pub email:             String,
  pub role:              UserRole,
  pub status:            UserStatus,
  pub profile_image_url: Option<String>,
  pub bio:               Option<String>,
}

impl From<&User> for PublicUser {
  fn from(u: &User) -> Self {
    Self {
      id:                u.id,
      name:              u.name.clone(),
      email:             u.email.clone(),
      role:              u.role,
      status:            u.status,
      profile_image_url: u.profile_image_url.clone(),
      bio:               u.bio.clone(),
    }
  }
}
