//! Supabase identity provider adapter.
//!
//! Implements the `IdentityProvider` port by asking a Supabase-compatible
//! auth service who owns a bearer token:
//!
//! ```text
//! GET {base_url}/auth/v1/user
//! apikey: <anon key>
//! Authorization: Bearer <token>
//! ```
//!
//! A `200` response carries the user record; `401`/`403` mean the token was
//! rejected. Anything else (network errors, other statuses, unparseable
//! bodies) is reported as `ServiceUnavailable`, which the fallback validator
//! absorbs.
//!
//! Password sign-in and sign-up are delegated as-is:
//!
//! ```text
//! POST {base_url}/auth/v1/token?grant_type=password   {email, password}
//! POST {base_url}/auth/v1/signup                      {email, password, data: {full_name}}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};

use crate::domain::foundation::{
    AccountSummary, AuthError, IdentityContext, ProviderSession, SignedIn, UserId,
};
use crate::ports::IdentityProvider;

/// Configuration for the Supabase adapter.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    pub base_url: String,
    anon_key: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: Secret::new(anon_key.into()),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn user_url(&self) -> String {
        self.endpoint("user")
    }

    fn password_grant_url(&self) -> String {
        self.endpoint("token?grant_type=password")
    }

    fn signup_url(&self) -> String {
        self.endpoint("signup")
    }
}

/// Token verification against Supabase auth.
pub struct SupabaseIdentityProvider {
    config: SupabaseConfig,
    client: Client,
}

impl SupabaseIdentityProvider {
    pub fn new(config: SupabaseConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn post_json(&self, url: String, body: &Value) -> Result<reqwest::Response, AuthError> {
        self.client
            .post(url)
            .header("apikey", self.config.anon_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Identity provider request failed: {}", e);
                AuthError::service_unavailable(e.to_string())
            })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<IdentityContext, AuthError> {
        let response = self
            .client
            .get(self.config.user_url())
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Identity provider request failed: {}", e);
                AuthError::service_unavailable(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AuthError::InvalidToken);
            }
            status => {
                return Err(AuthError::service_unavailable(format!(
                    "identity provider returned {}",
                    status
                )));
            }
        }

        let user: Value = response.json().await.map_err(|e| {
            AuthError::service_unavailable(format!("unreadable user record: {}", e))
        })?;

        identity_from_user_record(user)
    }

    async fn sign_in(&self, email: &str, password: &Secret<String>) -> Result<SignedIn, AuthError> {
        let body = json!({ "email": email, "password": password.expose_secret() });
        let response = self.post_json(self.config.password_grant_url(), &body).await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::UNPROCESSABLE_ENTITY => return Err(AuthError::InvalidCredentials),
            status => {
                return Err(AuthError::service_unavailable(format!(
                    "identity provider returned {}",
                    status
                )));
            }
        }

        let session: Value = response.json().await.map_err(|e| {
            AuthError::service_unavailable(format!("unreadable session: {}", e))
        })?;
        signed_in_from_session(&session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &Secret<String>,
        full_name: Option<&str>,
    ) -> Result<AccountSummary, AuthError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "data": { "full_name": full_name },
        });
        let response = self.post_json(self.config.signup_url(), &body).await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_client_error() {
            return Err(AuthError::RegistrationRejected(rejection_reason(&payload)));
        }
        if !status.is_success() {
            return Err(AuthError::service_unavailable(format!(
                "identity provider returned {}",
                status
            )));
        }

        // With email confirmation on, the body is the bare user record.
        let user = payload.get("user").unwrap_or(&payload);
        account_from_user_record(user)
            .ok_or_else(|| AuthError::service_unavailable("signup response has no user"))
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

/// Summarise a Supabase user record, if it carries a usable `id`.
fn account_from_user_record(user: &Value) -> Option<AccountSummary> {
    let id = user
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| UserId::new(id).ok())?;

    Some(AccountSummary {
        id,
        email: user.get("email").and_then(Value::as_str).map(str::to_string),
        full_name: user
            .pointer("/user_metadata/full_name")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn signed_in_from_session(session: &Value) -> Result<SignedIn, AuthError> {
    let access_token = session
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::service_unavailable("session has no access token"))?;
    let account = session
        .get("user")
        .and_then(account_from_user_record)
        .ok_or_else(|| AuthError::service_unavailable("session has no user"))?;

    Ok(SignedIn {
        account,
        session: ProviderSession {
            access_token: access_token.to_string(),
            refresh_token: session
                .get("refresh_token")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
    })
}

fn rejection_reason(payload: &Value) -> String {
    ["msg", "error_description", "message"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .unwrap_or("rejected by identity provider")
        .to_string()
}

/// Map a Supabase user record to an identity.
///
/// The record must carry a non-empty string `id`; the whole record is kept
/// as the identity's profile.
fn identity_from_user_record(user: Value) -> Result<IdentityContext, AuthError> {
    let subject = user
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| UserId::new(id).ok())
        .ok_or_else(|| AuthError::service_unavailable("user record has no id"))?;

    let email = user
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(IdentityContext::from_provider(subject, email, Some(user)))
}
