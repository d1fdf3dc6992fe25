//! OpenAPI Documentation
//!
//! Central OpenAPI specification for the account APIs.

use utoipa::OpenApi;

/// Account API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gatehouse Account API",
        version = "1.0.0",
        description = "REST APIs for registration, login, and account management"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Authentication and password recovery"),
        (name = "accounts", description = "Profile and role management")
    ),
    paths(
        // Auth API
        super::auth::login,
        super::auth::register,
        super::auth::refresh_token,
        super::auth::check_email,
        super::auth::get_security_question,
        super::auth::verify_security_answer,
        super::auth::reset_password,
        // Accounts API
        super::accounts::get_profile,
        super::accounts::update_profile,
        super::accounts::delete_account,
        super::accounts::change_role,
    ),
    components(
        schemas(
            // Auth schemas
            super::auth::LoginRequest,
            super::auth::RegisterRequest,
            super::auth::RefreshTokenRequest,
            super::auth::CheckEmailRequest,
            super::auth::CheckEmailResponse,
            super::auth::SecurityQuestionResponse,
            super::auth::VerifySecurityAnswerRequest,
            super::auth::VerifySecurityAnswerResponse,
            super::auth::ResetPasswordRequest,
            crate::service::auth::TokenPair,
            // Account schemas
            super::accounts::AccountResponse,
            super::accounts::UpdateProfileRequest,
            super::accounts::ChangeRoleRequest,
            crate::domain::Role,
            // Common schemas
            super::common::ApiError,
            super::common::SuccessResponse,
        )
    )
)]
pub struct AccountsApiDoc;
