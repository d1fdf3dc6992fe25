//! Auth API Endpoints
//!
//! Public authentication endpoints.
//! - POST /login - Password-based login
//! - POST /register - Account registration
//! - POST /refresh-token - Access token refresh (with rotation)
//! - POST /check-email - Email existence probe
//! - GET /security-question - Fetch an account's security question
//! - POST /verify-security-answer - Check a security answer
//! - POST /reset-password - Reset a password after answer verification

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::api::common::{require_field, ApiResult, SuccessResponse};
use crate::domain::{Account, Role};
use crate::error::AccountsError;
use crate::repository::AccountRepository;
use crate::service::auth::{AuthService, TokenPair};
use crate::service::password::PasswordService;

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address
    #[serde(default)]
    pub email: String,

    /// Password
    #[serde(default)]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// First name
    #[serde(default)]
    pub first_name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Nickname
    #[serde(default)]
    pub nickname: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Password
    #[serde(default)]
    pub password: String,

    /// Role (admin/user/banned); defaults to `user`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Security question prompt
    #[serde(default)]
    pub security_question: String,

    /// Security answer (stored hashed)
    #[serde(default)]
    pub security_answer: String,
}

/// Refresh token request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// The refresh token
    #[serde(default)]
    pub refresh_token: String,
}

/// Email check request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckEmailRequest {
    #[serde(default)]
    pub email: String,
}

/// Email check response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckEmailResponse {
    pub exists: bool,
}

/// Security question query
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SecurityQuestionQuery {
    /// Email address to look up
    pub email: String,
}

/// Security question response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityQuestionResponse {
    pub question: String,
}

/// Security answer verification request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifySecurityAnswerRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub security_answer: String,
}

/// Security answer verification response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifySecurityAnswerResponse {
    pub valid: bool,
}

/// Password reset request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,

    /// Security answer gating the reset
    #[serde(default)]
    pub security_answer: String,

    #[serde(default)]
    pub new_password: String,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthApiState {
    pub auth_service: Arc<AuthService>,
    pub account_repo: Arc<AccountRepository>,
    pub password_service: Arc<PasswordService>,
}

/// Login with email and password
///
/// Whether the email is unknown or the password is wrong, the response
/// is the same 401; nothing distinguishes the two cases.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenPair),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthApiState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<TokenPair> {
    require_field(&req.email, "email")?;
    require_field(&req.password, "password")?;

    let account = state
        .account_repo
        .find_by_email(&req.email)
        .await?
        .ok_or(AccountsError::InvalidCredentials)?;

    if !state
        .password_service
        .verify(&req.password, &account.password_hash)
    {
        return Err(AccountsError::InvalidCredentials);
    }

    Ok(Json(state.auth_service.generate_token_pair(&account)?))
}

/// Register a new account
///
/// Password and security answer are hashed before the write; the role
/// defaults to `user` when not supplied.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenPair),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AuthApiState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenPair>), AccountsError> {
    require_field(&req.first_name, "firstName")?;
    require_field(&req.last_name, "lastName")?;
    require_field(&req.nickname, "nickname")?;
    require_field(&req.email, "email")?;
    require_field(&req.password, "password")?;
    require_field(&req.security_question, "securityQuestion")?;
    require_field(&req.security_answer, "securityAnswer")?;

    let role = match req.role.as_deref() {
        Some(s) => Role::parse(s)
            .ok_or_else(|| AccountsError::validation(format!("Invalid role: {}", s)))?,
        None => Role::default(),
    };

    if state.account_repo.exists_by_email(&req.email).await? {
        return Err(AccountsError::duplicate("Account", "email", &req.email));
    }

    let password_hash = state.password_service.hash(&req.password)?;
    let answer_hash = state.password_service.hash(&req.security_answer)?;

    let account = Account::new(
        req.first_name,
        req.last_name,
        req.nickname,
        req.email,
        password_hash,
        req.security_question,
        answer_hash,
    )
    .with_role(role);

    state.account_repo.insert(&account).await?;

    let pair = state.auth_service.generate_token_pair(&account)?;
    Ok((StatusCode::CREATED, Json(pair)))
}

/// Refresh the access token
///
/// Verifies the refresh token against the refresh-signing secret, loads
/// the referenced account, and mints a fresh pair (the refresh token is
/// rotated).
#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed", body = TokenPair),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn refresh_token(
    State(state): State<AuthApiState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<TokenPair> {
    require_field(&req.refresh_token, "refreshToken")?;

    let claims = state.auth_service.verify_refresh_token(&req.refresh_token)?;

    let account = state
        .account_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AccountsError::not_found("Account", &claims.sub))?;

    Ok(Json(state.auth_service.generate_token_pair(&account)?))
}

/// Check whether an email is registered
#[utoipa::path(
    post,
    path = "/check-email",
    tag = "auth",
    request_body = CheckEmailRequest,
    responses(
        (status = 200, description = "Check result", body = CheckEmailResponse)
    )
)]
pub async fn check_email(
    State(state): State<AuthApiState>,
    Json(req): Json<CheckEmailRequest>,
) -> ApiResult<CheckEmailResponse> {
    require_field(&req.email, "email")?;

    let exists = state.account_repo.exists_by_email(&req.email).await?;
    Ok(Json(CheckEmailResponse { exists }))
}

/// Get an account's security question
#[utoipa::path(
    get,
    path = "/security-question",
    tag = "auth",
    params(SecurityQuestionQuery),
    responses(
        (status = 200, description = "Security question", body = SecurityQuestionResponse),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn get_security_question(
    State(state): State<AuthApiState>,
    Query(query): Query<SecurityQuestionQuery>,
) -> ApiResult<SecurityQuestionResponse> {
    let account = state
        .account_repo
        .find_by_email(&query.email)
        .await?
        .ok_or_else(|| AccountsError::not_found("Account", &query.email))?;

    Ok(Json(SecurityQuestionResponse {
        question: account.security_question,
    }))
}

/// Verify a security answer
///
/// Unknown email and wrong answer both come back as `valid: false`.
#[utoipa::path(
    post,
    path = "/verify-security-answer",
    tag = "auth",
    request_body = VerifySecurityAnswerRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifySecurityAnswerResponse)
    )
)]
pub async fn verify_security_answer(
    State(state): State<AuthApiState>,
    Json(req): Json<VerifySecurityAnswerRequest>,
) -> ApiResult<VerifySecurityAnswerResponse> {
    require_field(&req.email, "email")?;

    let valid = state
        .account_repo
        .find_by_email(&req.email)
        .await?
        .map(|account| {
            state
                .password_service
                .verify(&req.security_answer, &account.security_answer_hash)
        })
        .unwrap_or(false);

    Ok(Json(VerifySecurityAnswerResponse { valid }))
}

/// Reset a password
///
/// Gated by the security answer: the stored answer hash must verify
/// before the new password is written.
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = SuccessResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Security answer does not match"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn reset_password(
    State(state): State<AuthApiState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<SuccessResponse> {
    require_field(&req.email, "email")?;
    require_field(&req.security_answer, "securityAnswer")?;
    require_field(&req.new_password, "newPassword")?;

    let mut account = state
        .account_repo
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AccountsError::not_found("Account", &req.email))?;

    if !state
        .password_service
        .verify(&req.security_answer, &account.security_answer_hash)
    {
        return Err(AccountsError::unauthorized("Security answer does not match"));
    }

    let new_hash = state.password_service.hash(&req.new_password)?;
    account.set_password_hash(new_hash);
    state.account_repo.update(&account).await?;

    Ok(Json(SuccessResponse::with_message("Password reset successfully")))
}

/// Create the auth router
pub fn auth_router(state: AuthApiState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/refresh-token", post(refresh_token))
        .route("/check-email", post(check_email))
        .route("/security-question", get(get_security_question))
        .route("/verify-security-answer", post(verify_security_answer))
        .route("/reset-password", post(reset_password))
        .with_state(state)
}
