//! Auth Service
//!
//! Issues and verifies signed access and refresh tokens (JWT, HS256).
//! Access and refresh tokens are signed with two distinct secrets so a
//! refresh token can never pass as an access token or vice versa.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Account, Role};
use crate::error::{AccountsError, Result};

/// Token service configuration.
///
/// Both signing secrets are required at process start; they are injected
/// here rather than read from ambient globals.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing/verifying access tokens
    pub access_secret: String,

    /// Distinct secret for signing/verifying refresh tokens
    pub refresh_secret: String,

    /// Issuer claim
    pub issuer: String,

    /// Access token lifetime in seconds
    pub access_token_expiry_secs: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_secs: i64,
}

impl AuthConfig {
    /// Load the configuration from the environment.
    ///
    /// `GATE_JWT_ACCESS_SECRET` and `GATE_JWT_REFRESH_SECRET` are
    /// required; a missing secret is a fatal startup condition.
    pub fn from_env() -> Result<Self> {
        let access_secret = std::env::var("GATE_JWT_ACCESS_SECRET").map_err(|_| {
            AccountsError::configuration("GATE_JWT_ACCESS_SECRET is not set")
        })?;
        let refresh_secret = std::env::var("GATE_JWT_REFRESH_SECRET").map_err(|_| {
            AccountsError::configuration("GATE_JWT_REFRESH_SECRET is not set")
        })?;

        Ok(Self {
            access_secret,
            refresh_secret,
            issuer: env_or("GATE_JWT_ISSUER", "gatehouse"),
            access_token_expiry_secs: env_or_parse("GATE_ACCESS_TOKEN_TTL_SECS", 3600),
            refresh_token_expiry_secs: env_or_parse("GATE_REFRESH_TOKEN_TTL_SECS", 604800),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Access token payload: identity plus the role at issuance time.
///
/// The embedded role may go stale if the account's role changes before
/// the token expires; handlers gating privileged operations re-fetch the
/// account instead of trusting this claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject - account ID
    pub sub: String,
    /// Email at issuance time
    pub email: String,
    /// Role at issuance time
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

/// Refresh token payload: identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// Subject - account ID
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

/// Access token + refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Refresh token
    pub refresh_token: String,
}

/// Issues and verifies signed tokens.
pub struct AuthService {
    config: AuthConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }

    /// Sign a short-lived access token carrying {id, email, role}.
    pub fn generate_access_token(&self, account: &Account) -> Result<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: account.id.clone(),
            email: account.email.clone(),
            role: account.role,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.access_token_expiry_secs)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.access_encoding)?)
    }

    /// Sign a long-lived refresh token carrying only the account ID.
    pub fn generate_refresh_token(&self, account: &Account) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshTokenClaims {
            sub: account.id.clone(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.refresh_token_expiry_secs)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.refresh_encoding)?)
    }

    /// Mint a fresh access + refresh token pair for an account.
    pub fn generate_token_pair(&self, account: &Account) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(account)?,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiry_secs,
            refresh_token: self.generate_refresh_token(account)?,
        })
    }

    /// Verify an access token's signature and expiry.
    ///
    /// Every failure mode (malformed, forged, expired, wrong issuer)
    /// collapses to the same `InvalidToken` error; callers cannot tell
    /// an expired token from a forged one.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims> {
        decode::<AccessTokenClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AccountsError::InvalidToken)
    }

    /// Verify a refresh token's signature and expiry.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims> {
        decode::<RefreshTokenClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AccountsError::InvalidToken)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-for-testing-minimum-32-chars".to_string(),
            refresh_secret: "refresh-secret-for-testing-minimum-32-chars".to_string(),
            issuer: "gatehouse".to_string(),
            access_token_expiry_secs: 3600,
            refresh_token_expiry_secs: 604800,
        }
    }

    fn test_account() -> Account {
        Account::new(
            "Ada",
            "Lovelace",
            "ada",
            "ada@example.com",
            "$argon2id$fake-hash",
            "First pet?",
            "$argon2id$fake-answer-hash",
        )
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = AuthService::new(test_config());
        let account = test_account();

        let token = service.generate_access_token(&account).unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, account.email);
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_pair() {
        let service = AuthService::new(test_config());
        let account = test_account();

        let pair = service.generate_token_pair(&account).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);

        let access = service.verify_access_token(&pair.access_token).unwrap();
        let refresh = service.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(access.sub, account.id);
        assert_eq!(refresh.sub, account.id);
    }

    #[test]
    fn test_expired_access_token_fails() {
        let service = AuthService::new(test_config());
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: "acct-1".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::User,
            iss: "gatehouse".to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(test_config().access_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify_access_token(&token),
            Err(AccountsError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_fails_uniformly() {
        let service = AuthService::new(test_config());
        let mut other = test_config();
        other.access_secret = "a-completely-different-signing-secret-value".to_string();
        let forged = AuthService::new(other)
            .generate_access_token(&test_account())
            .unwrap();

        // Forged and malformed tokens fail with the same error as expired ones.
        assert!(matches!(
            service.verify_access_token(&forged),
            Err(AccountsError::InvalidToken)
        ));
        assert!(matches!(
            service.verify_access_token("not.a.token"),
            Err(AccountsError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_does_not_verify_as_access_token() {
        let service = AuthService::new(test_config());
        let account = test_account();

        let refresh = service.generate_refresh_token(&account).unwrap();
        assert!(service.verify_access_token(&refresh).is_err());

        let access = service.generate_access_token(&account).unwrap();
        assert!(service.verify_refresh_token(&access).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
