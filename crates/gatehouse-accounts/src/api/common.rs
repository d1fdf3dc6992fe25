//! Common API types and utilities

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AccountsError;

/// Standard API error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Success response with optional message
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

pub type ApiResult<T> = Result<Json<T>, AccountsError>;

/// Reject blank required fields at the write boundary.
pub fn require_field(value: &str, name: &str) -> Result<(), AccountsError> {
    if value.trim().is_empty() {
        return Err(AccountsError::validation(format!("{} is required", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_serialization() {
        let json = serde_json::to_string(&SuccessResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);

        let json = serde_json::to_string(&SuccessResponse::with_message("done")).unwrap();
        assert!(json.contains("done"));
    }

    #[test]
    fn test_require_field() {
        assert!(require_field("value", "email").is_ok());
        assert!(require_field("", "email").is_err());
        assert!(require_field("   ", "email").is_err());
    }
}
