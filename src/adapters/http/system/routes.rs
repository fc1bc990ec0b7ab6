//! Axum router configuration for service-level endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    create_status_check, current_user, health, list_status_checks, root, SystemAppState,
};

/// Create the service-level API router.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Welcome message
/// - `GET /health` - Health check with connection count
/// - `GET /status`, `POST /status` - Legacy status checks
///
/// ## Require authentication
/// - `GET /auth/me` - Current identity
///
/// Mount under `/api` behind `auth_middleware`.
pub fn system_router() -> Router<SystemAppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/status", get(list_status_checks).post(create_status_check))
        .route("/auth/me", get(current_user))
}
