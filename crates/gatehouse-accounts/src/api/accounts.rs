//! Account API Endpoints
//!
//! Token-guarded endpoints for the caller's own profile, plus the
//! admin-only role change operation.

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{require_field, ApiResult, SuccessResponse};
use crate::api::middleware::Authenticated;
use crate::domain::{Account, AccountAction, Role};
use crate::error::AccountsError;
use crate::repository::AccountRepository;

/// Account response DTO — never carries the password or security-answer
/// hashes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub role: Role,
    pub security_question: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name,
            last_name: a.last_name,
            nickname: a.nickname,
            email: a.email,
            role: a.role,
            security_question: a.security_question,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// Profile update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
}

/// Role change request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    /// Email of the target account
    #[serde(default)]
    pub email: String,

    /// New role (admin/user/banned)
    #[serde(default)]
    pub role: String,
}

/// Accounts service state
#[derive(Clone)]
pub struct AccountsApiState {
    pub account_repo: Arc<AccountRepository>,
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/user",
    tag = "accounts",
    responses(
        (status = 200, description = "Account profile", body = AccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_profile(
    State(state): State<AccountsApiState>,
    Authenticated(claims): Authenticated,
) -> ApiResult<AccountResponse> {
    let account = state
        .account_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AccountsError::not_found("Account", &claims.sub))?;

    Ok(Json(account.into()))
}

/// Update the caller's profile
///
/// Only the display fields and email are updatable here; password
/// changes go through the reset flow and roles through the role change
/// endpoint.
#[utoipa::path(
    put,
    path = "/user",
    tag = "accounts",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = AccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<AccountsApiState>,
    Authenticated(claims): Authenticated,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<AccountResponse> {
    let mut account = state
        .account_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AccountsError::not_found("Account", &claims.sub))?;

    if let Some(email) = req.email {
        require_field(&email, "email")?;
        if email != account.email && state.account_repo.exists_by_email(&email).await? {
            return Err(AccountsError::duplicate("Account", "email", &email));
        }
        account.email = email;
    }
    if let Some(first_name) = req.first_name {
        require_field(&first_name, "firstName")?;
        account.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        require_field(&last_name, "lastName")?;
        account.last_name = last_name;
    }
    if let Some(nickname) = req.nickname {
        require_field(&nickname, "nickname")?;
        account.nickname = nickname;
    }

    account.touch();
    state.account_repo.update(&account).await?;

    Ok(Json(account.into()))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/user",
    tag = "accounts",
    responses(
        (status = 200, description = "Account deleted", body = SuccessResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    State(state): State<AccountsApiState>,
    Authenticated(claims): Authenticated,
) -> ApiResult<SuccessResponse> {
    let deleted = state.account_repo.delete(&claims.sub).await?;
    if !deleted {
        return Err(AccountsError::not_found("Account", &claims.sub));
    }

    Ok(Json(SuccessResponse::with_message("Account deleted")))
}

/// Change another account's role (admin only)
///
/// The acting account's role is re-fetched from the store rather than
/// taken from the token, since the embedded role may be stale.
#[utoipa::path(
    put,
    path = "/user/role",
    tag = "accounts",
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = SuccessResponse),
        (status = 400, description = "Invalid role"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Target account not found")
    )
)]
pub async fn change_role(
    State(state): State<AccountsApiState>,
    Authenticated(claims): Authenticated,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<SuccessResponse> {
    require_field(&req.email, "email")?;

    let new_role = Role::parse(&req.role)
        .ok_or_else(|| AccountsError::validation(format!("Invalid role: {}", req.role)))?;

    let acting = state
        .account_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AccountsError::unauthorized("Acting account no longer exists"))?;

    if !acting.role.can_perform(AccountAction::ChangeRole) {
        return Err(AccountsError::forbidden(
            "Access denied: administrator role required",
        ));
    }

    let mut target = state
        .account_repo
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AccountsError::not_found("Account", &req.email))?;

    target.set_role(new_role);
    state.account_repo.update(&target).await?;

    Ok(Json(SuccessResponse::with_message(format!(
        "Role for {} changed to {}",
        target.email, new_role
    ))))
}

/// Create the accounts router (nested under /api)
pub fn accounts_router(state: AccountsApiState) -> Router {
    Router::new()
        .route(
            "/user",
            get(get_profile).put(update_profile).delete(delete_account),
        )
        .route("/user/role", put(change_role))
        .route("/profile", get(get_profile))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
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
    fn test_account_response_excludes_hashes() {
        let response: AccountResponse = sample_account().into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("ada@example.com"));
        assert!(json.contains("securityQuestion"));
        assert!(!json.contains("password"));
        assert!(!json.contains("fake-hash"));
        assert!(!json.contains("fake-answer-hash"));
    }

    #[test]
    fn test_change_role_request_deserialization() {
        let req: ChangeRoleRequest =
            serde_json::from_str(r#"{"email":"a@x.com","role":"admin"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(Role::parse(&req.role), Some(Role::Admin));
    }

    #[test]
    fn test_update_request_all_fields_optional() {
        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.first_name.is_none());
        assert!(req.email.is_none());
    }
}
