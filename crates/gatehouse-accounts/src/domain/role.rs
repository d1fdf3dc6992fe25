//! Role and Access Policy
//!
//! Authorization model for role-based access control.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role
///
/// `Banned` is part of the stored enumeration but is not currently a
/// denial condition anywhere in the request flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Banned,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// Actions subject to the role policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    /// Read the caller's own profile
    ViewProfile,
    /// Update the caller's own profile
    UpdateProfile,
    /// Delete the caller's own account
    DeleteAccount,
    /// Change another account's role
    ChangeRole,
}

impl Role {
    /// Parse a role from its wire representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            "banned" => Some(Role::Banned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Banned => "banned",
        }
    }

    /// Pure policy decision: may an account with this role perform the
    /// given action?
    ///
    /// Only changing another account's role is privileged; everything
    /// else requires successful authentication, not a specific role.
    pub fn can_perform(&self, action: AccountAction) -> bool {
        match action {
            AccountAction::ChangeRole => matches!(self, Role::Admin),
            AccountAction::ViewProfile
            | AccountAction::UpdateProfile
            | AccountAction::DeleteAccount => true,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
