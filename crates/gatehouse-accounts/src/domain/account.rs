//! Account Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// Persistent account record, collection `accounts`.
///
/// The `password_hash` and `security_answer_hash` fields only ever hold
/// Argon2id PHC strings once past the write boundary; plaintext secrets
/// never reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque string ID
    #[serde(rename = "_id")]
    pub id: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Nickname shown in clients
    pub nickname: String,

    /// Unique email address (case-sensitive equality as stored)
    pub email: String,

    /// Argon2id hash of the password
    pub password_hash: String,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Security question prompt (plaintext)
    pub security_question: String,

    /// Argon2id hash of the security answer
    pub security_answer_hash: String,

    /// Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        nickname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        security_question: impl Into<String>,
        security_answer_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: nickname.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::default(),
            security_question: security_question.into(),
            security_answer_hash: security_answer_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.touch();
    }

    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.touch();
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
