//! Authentication for InsightMaster: argon2 password hashing, JWT issuance
//! and validation, and the account service (register / login / validate)
//! generic over any [`insight_core::store::InsightStore`].

pub mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use error::{Error, Result};
pub use jwt::{Claims, JwtService};
pub use service::{AuthService, AuthResponse};
