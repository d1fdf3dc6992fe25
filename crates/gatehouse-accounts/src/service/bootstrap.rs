//! Bootstrap Admin Seeding
//!
//! Guarantees an `admin`-role account exists at process start. The seed
//! identity comes from configuration; nothing is hardcoded, and seeding
//! is skipped entirely when no credentials are configured.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Account, Role};
use crate::error::Result;
use crate::repository::AccountRepository;
use crate::service::PasswordService;

/// Seed identity for the bootstrap admin account.
#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub security_question: String,
    pub security_answer: String,
}

impl BootstrapAdminConfig {
    /// Load the seed identity from the environment.
    ///
    /// Returns `None` unless `GATE_ADMIN_EMAIL`, `GATE_ADMIN_PASSWORD`,
    /// and `GATE_ADMIN_SECURITY_ANSWER` are all set; there is no
    /// built-in default credential.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("GATE_ADMIN_EMAIL").ok()?;
        let password = std::env::var("GATE_ADMIN_PASSWORD").ok()?;

        let env_or = |key: &str, default: &str| {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Some(Self {
            email,
            password,
            first_name: env_or("GATE_ADMIN_FIRST_NAME", "Platform"),
            last_name: env_or("GATE_ADMIN_LAST_NAME", "Admin"),
            nickname: env_or("GATE_ADMIN_NICKNAME", "admin"),
            security_question: env_or(
                "GATE_ADMIN_SECURITY_QUESTION",
                "Bootstrap admin recovery phrase?",
            ),
            security_answer: std::env::var("GATE_ADMIN_SECURITY_ANSWER").ok()?,
        })
    }
}

/// Creates the bootstrap admin account if no admin exists yet.
pub struct AdminSeeder {
    account_repo: Arc<AccountRepository>,
    password_service: Arc<PasswordService>,
}

impl AdminSeeder {
    pub fn new(account_repo: Arc<AccountRepository>, password_service: Arc<PasswordService>) -> Self {
        Self {
            account_repo,
            password_service,
        }
    }

    /// Idempotently create the bootstrap admin.
    ///
    /// Check-then-create is acceptable here: a concurrent-startup race
    /// fails on the unique email index rather than producing duplicates.
    /// Returns `true` when an account was created.
    pub async fn seed(&self, config: &BootstrapAdminConfig) -> Result<bool> {
        if self.account_repo.exists_by_role(Role::Admin).await? {
            info!("Admin account already exists, skipping bootstrap");
            return Ok(false);
        }

        let password_hash = self.password_service.hash(&config.password)?;
        let answer_hash = self.password_service.hash(&config.security_answer)?;

        let admin = Account::new(
            &config.first_name,
            &config.last_name,
            &config.nickname,
            &config.email,
            password_hash,
            &config.security_question,
            answer_hash,
        )
        .with_role(Role::Admin);

        self.account_repo.insert(&admin).await?;
        info!(email = %config.email, "Bootstrap admin created");

        Ok(true)
    }

    /// Seed from the environment, logging instead of failing when the
    /// seed identity is not configured.
    pub async fn seed_from_env(&self) -> Result<bool> {
        match BootstrapAdminConfig::from_env() {
            Some(config) => self.seed(&config).await,
            None => {
                warn!("Bootstrap admin credentials not configured, skipping seeding");
                Ok(false)
            }
        }
    }
}
