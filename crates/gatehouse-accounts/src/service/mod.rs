//! Service Layer
//!
//! Business logic services: credential hashing, token issuance and
//! verification, and bootstrap-admin seeding.

pub mod auth;
pub mod bootstrap;
pub mod password;

pub use auth::{extract_bearer_token, AccessTokenClaims, AuthConfig, AuthService, RefreshTokenClaims, TokenPair};
pub use bootstrap::{AdminSeeder, BootstrapAdminConfig};
pub use password::PasswordService;
