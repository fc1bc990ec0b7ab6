//! Data transfer objects for account endpoints.

use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountSummary, SignedIn};

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Public account fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountUserResponse {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl From<AccountSummary> for AccountUserResponse {
    fn from(account: AccountSummary) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email,
            full_name: account.full_name,
        }
    }
}

/// Response for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub user: AccountUserResponse,
}

impl From<SignedIn> for LoginResponse {
    fn from(signed_in: SignedIn) -> Self {
        Self {
            access_token: signed_in.session.access_token,
            refresh_token: signed_in.session.refresh_token,
            token_type: "bearer".to_string(),
            user: signed_in.account.into(),
        }
    }
}

/// Response for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: AccountUserResponse,
}

impl From<AccountSummary> for RegisterResponse {
    fn from(account: AccountSummary) -> Self {
        Self {
            message: "Registration successful".to_string(),
            user: account.into(),
        }
    }
}
