//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use secrecy::ExposeSecret;

use crate::adapters::http::system::ErrorResponse;
use crate::domain::foundation::AuthError;
use crate::ports::IdentityProvider;

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// State for the account handlers.
#[derive(Clone, Default)]
pub struct AccountAppState {
    /// `None` when no identity provider is configured.
    pub provider: Option<Arc<dyn IdentityProvider>>,
}

impl AccountAppState {
    fn provider(&self) -> Result<&Arc<dyn IdentityProvider>, AccountApiError> {
        self.provider.as_ref().ok_or(AccountApiError::ProviderNotConfigured)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/auth/login - Password sign-in through the identity provider
pub async fn login(
    State(state): State<AccountAppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AccountApiError> {
    let provider = state.provider()?;
    if request.email.trim().is_empty() || request.password.expose_secret().is_empty() {
        return Err(AccountApiError::InvalidCredentials);
    }

    match provider.sign_in(request.email.trim(), &request.password).await {
        Ok(signed_in) => {
            tracing::info!(user_id = %signed_in.account.id, "Password sign-in succeeded");
            Ok(Json(LoginResponse::from(signed_in)))
        }
        Err(e) => {
            log_provider_failure(&e, "sign-in");
            Err(AccountApiError::InvalidCredentials)
        }
    }
}

/// POST /api/auth/register - Account creation through the identity provider
pub async fn register(
    State(state): State<AccountAppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AccountApiError> {
    let provider = state.provider()?;
    if request.email.trim().is_empty() || request.password.expose_secret().is_empty() {
        return Err(AccountApiError::RegistrationFailed);
    }

    let full_name = request.full_name.as_deref().filter(|n| !n.trim().is_empty());
    match provider
        .sign_up(request.email.trim(), &request.password, full_name)
        .await
    {
        Ok(account) => {
            tracing::info!(user_id = %account.id, "Account registered");
            Ok(Json(RegisterResponse::from(account)))
        }
        Err(e) => {
            log_provider_failure(&e, "sign-up");
            Err(AccountApiError::RegistrationFailed)
        }
    }
}

fn log_provider_failure(error: &AuthError, operation: &'static str) {
    if error.is_transient() {
        tracing::error!(operation, "Identity provider unavailable: {}", error);
    } else {
        tracing::debug!(operation, "Identity provider refused request: {}", error);
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Account endpoint failures. Provider detail is logged, never returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountApiError {
    InvalidCredentials,
    RegistrationFailed,
    ProviderNotConfigured,
}

impl IntoResponse for AccountApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            AccountApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Incorrect email or password",
            ),
            AccountApiError::RegistrationFailed => (
                StatusCode::BAD_REQUEST,
                "REGISTRATION_FAILED",
                "Registration failed",
            ),
            AccountApiError::ProviderNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PROVIDER_NOT_CONFIGURED",
                "Identity provider is not configured",
            ),
        };
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
