//! API Layer
//!
//! REST API endpoints for the account service.

pub mod accounts;
pub mod auth;
pub mod common;
pub mod middleware;
pub mod openapi;

pub use common::*;
pub use middleware::{AppState, Authenticated};

pub use accounts::{accounts_router, AccountsApiState};
pub use auth::{auth_router, AuthApiState};
pub use openapi::AccountsApiDoc;
