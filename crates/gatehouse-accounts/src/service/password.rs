//! Password Service
//!
//! One-way hashing and verification for passwords and security answers
//! using Argon2id with per-secret random salts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AccountsError, Result};

/// Hashes and verifies shared secrets (passwords, security answers).
#[derive(Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a secret into a PHC-format string.
    pub fn hash(&self, secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AccountsError::Hashing {
                message: e.to_string(),
            })?;
        Ok(hash.to_string())
    }

    /// Check a candidate secret against a stored hash.
    ///
    /// Returns `false` for a wrong secret AND for an unparseable hash;
    /// callers must treat both as authentication failure.
    pub fn verify(&self, secret: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
