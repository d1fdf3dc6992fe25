//! Gatehouse Account Server
//!
//! Production server for the account REST APIs:
//! - Auth APIs: login, register, refresh-token, password recovery
//! - Account APIs: profile retrieval/update/delete, role change
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATE_API_PORT` | `8080` | HTTP API port |
//! | `GATE_METRICS_PORT` | `9090` | Metrics/health port |
//! | `GATE_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `GATE_MONGO_DB` | `gatehouse` | MongoDB database name |
//! | `GATE_JWT_ACCESS_SECRET` | - | Access-token signing secret (required) |
//! | `GATE_JWT_REFRESH_SECRET` | - | Refresh-token signing secret (required) |
//! | `GATE_JWT_ISSUER` | `gatehouse` | JWT issuer claim |
//! | `GATE_ACCESS_TOKEN_TTL_SECS` | `3600` | Access token lifetime |
//! | `GATE_REFRESH_TOKEN_TTL_SECS` | `604800` | Refresh token lifetime |
//! | `GATE_ADMIN_EMAIL` | - | Bootstrap admin email (seeding skipped if unset) |
//! | `GATE_ADMIN_PASSWORD` | - | Bootstrap admin password |
//! | `GATE_ADMIN_SECURITY_ANSWER` | - | Bootstrap admin security answer |
//! | `GATE_CORS_ORIGIN` | `*` | Allowed CORS origin |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::{response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use gatehouse_accounts::api::middleware::AppState;
use gatehouse_accounts::api::{
    accounts_router, auth_router, AccountsApiDoc, AccountsApiState, AuthApiState,
};
use gatehouse_accounts::repository::{ensure_indexes, AccountRepository};
use gatehouse_accounts::service::{AdminSeeder, AuthConfig, AuthService, PasswordService};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Gatehouse Account Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("GATE_API_PORT", 8080);
    let metrics_port: u16 = env_or_parse("GATE_METRICS_PORT", 9090);
    let mongo_url = env_or("GATE_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("GATE_MONGO_DB", "gatehouse");

    // Both signing secrets are required; a missing one is fatal here.
    let auth_config = AuthConfig::from_env()?;

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Unique email index backs the duplicate-registration invariant
    ensure_indexes(&db).await?;

    // Initialize repositories and services
    let account_repo = Arc::new(AccountRepository::new(&db));
    let password_service = Arc::new(PasswordService::new());
    let auth_service = Arc::new(AuthService::new(auth_config));
    info!("Repositories and services initialized");

    // Idempotently seed the bootstrap admin from configuration
    let seeder = AdminSeeder::new(account_repo.clone(), password_service.clone());
    if let Err(e) = seeder.seed_from_env().await {
        tracing::warn!("Bootstrap admin seeding failed: {}", e);
    }

    // Create AppState for the auth guard
    let app_state = AppState {
        auth_service: auth_service.clone(),
    };

    // Build API states
    let auth_api_state = AuthApiState {
        auth_service,
        account_repo: account_repo.clone(),
        password_service,
    };
    let accounts_state = AccountsApiState { account_repo };

    // CORS for the browser frontend
    let cors_origin = env_or("GATE_CORS_ORIGIN", "*");
    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        CorsLayer::new()
            .allow_origin(cors_origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // Build API router
    let app = Router::new()
        .nest(
            "/api",
            auth_router(auth_api_state).merge(accounts_router(accounts_state)),
        )
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", AccountsApiDoc::openapi()))
        // Auth guard state
        .layer(axum::Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let api_listener = TcpListener::bind(&api_addr).await?;
    let api_task = tokio::spawn(async move {
        axum::serve(api_listener, app).await.unwrap();
    });

    // Start metrics server
    let metrics_addr = format!("0.0.0.0:{}", metrics_port);
    info!("Metrics server listening on http://{}/metrics", metrics_addr);

    let metrics_app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler));

    let metrics_listener = TcpListener::bind(&metrics_addr).await?;
    let metrics_task = tokio::spawn(async move {
        axum::serve(metrics_listener, metrics_app).await.unwrap();
    });

    info!("Gatehouse Account Server started");
    info!("Press Ctrl+C to shutdown");

    // Wait for shutdown
    shutdown_signal().await;
    info!("Shutdown signal received...");

    api_task.abort();
    metrics_task.abort();

    info!("Gatehouse Account Server shutdown complete");
    Ok(())
}

async fn metrics_handler() -> &'static str {
    "# HELP gatehouse_up Account service is up\n# TYPE gatehouse_up gauge\ngatehouse_up 1\n"
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn ready_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "READY"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
