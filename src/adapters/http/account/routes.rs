//! Axum router configuration for account endpoints.

use axum::{routing::post, Router};

use super::handlers::{login, register, AccountAppState};

/// Create the account router.
///
/// - `POST /auth/login` - Password sign-in
/// - `POST /auth/register` - Account creation
///
/// Mount under `/api`.
pub fn account_router() -> Router<AccountAppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}
