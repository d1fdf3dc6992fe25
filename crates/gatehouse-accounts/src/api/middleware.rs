//! API Middleware
//!
//! Authentication middleware for Axum. The guard only verifies the
//! presented token; it never queries the account store. Handlers that
//! need the current role re-fetch the account themselves.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::common::ApiError;
use crate::service::auth::AccessTokenClaims;
use crate::service::{extract_bearer_token, AuthService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

/// Extractor for authenticated requests.
///
/// Rejects with 401 both when no token is presented and when the token
/// fails verification; the two cases keep distinct messages but the same
/// status class.
pub struct Authenticated(pub AccessTokenClaims);

fn unauthorized(message: &str) -> Response {
    let error = ApiError {
        error: "UNAUTHORIZED".to_string(),
        message: message.to_string(),
        details: None,
    };
    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Access denied: no token provided"))?;

        let token = extract_bearer_token(auth_header)
            .ok_or_else(|| unauthorized("Invalid Authorization header format"))?;

        let app_state = parts.extensions.get::<AppState>().ok_or_else(|| {
            let error = ApiError {
                error: "INTERNAL_ERROR".to_string(),
                message: "AppState not found".to_string(),
                details: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        })?;

        let claims = app_state
            .auth_service
            .verify_access_token(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(Authenticated(claims))
    }
}
