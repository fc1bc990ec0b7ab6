//! HTTP handlers for service-level endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::websocket::ConnectionRegistry;
use crate::domain::foundation::{Timestamp, ValidationError};

use super::dto::{
    CreateStatusCheckRequest, CurrentUserResponse, ErrorResponse, HealthResponse,
    StatusCheckResponse, WelcomeResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// State shared by the service-level handlers.
#[derive(Clone)]
pub struct SystemAppState {
    pub registry: Arc<ConnectionRegistry>,
    pub app_name: String,
    pub app_version: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/health - Liveness plus open connection count
pub async fn health(State(state): State<SystemAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Timestamp::now().to_rfc3339(),
        version: state.app_version.clone(),
        connections: state.registry.connection_count().await,
    })
}

/// GET /api/ - Welcome message
pub async fn root(State(state): State<SystemAppState>) -> impl IntoResponse {
    Json(WelcomeResponse {
        message: format!("Welcome to {}", state.app_name),
        version: state.app_version.clone(),
        timestamp: Timestamp::now().to_rfc3339(),
    })
}

/// GET /api/auth/me - Identity behind the bearer token
pub async fn current_user(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
    Json(CurrentUserResponse::from(identity))
}

/// POST /api/status - Record a status check (not persisted)
pub async fn create_status_check(
    Json(request): Json<CreateStatusCheckRequest>,
) -> Result<impl IntoResponse, SystemApiError> {
    if request.client_name.trim().is_empty() {
        return Err(ValidationError::empty_field("client_name").into());
    }

    Ok(Json(StatusCheckResponse::new(request.client_name)))
}

/// GET /api/status - The service's own status check
pub async fn list_status_checks(State(state): State<SystemAppState>) -> impl IntoResponse {
    Json(vec![StatusCheckResponse::new(state.app_name.clone())])
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for service-level endpoints.
#[derive(Debug)]
pub struct SystemApiError(ValidationError);

impl From<ValidationError> for SystemApiError {
    fn from(err: ValidationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SystemApiError {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("VALIDATION_FAILED", self.0.to_string());
        (StatusCode::BAD_REQUEST, Json(error)).into_response()
    }
}
