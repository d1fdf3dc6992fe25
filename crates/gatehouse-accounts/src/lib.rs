//! Gatehouse Accounts
//!
//! Core account service providing:
//! - Account registration and profile management
//! - Password and security-answer hashing (Argon2id)
//! - Signed access/refresh token issuance and verification
//! - Role-based access control for privileged operations
//! - Idempotent bootstrap-admin seeding

pub mod domain;
pub mod repository;
pub mod service;
pub mod api;
pub mod error;

pub use domain::*;
pub use error::AccountsError;
