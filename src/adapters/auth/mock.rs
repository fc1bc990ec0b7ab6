//! Mock authentication adapters for testing.
//!
//! These adapters implement the `SessionValidator` and `IdentityProvider`
//! ports without a hosted auth service.
//!
//! # Example
//!
//! ```ignore
//! use smart_tour_gateway::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new().with_test_user("valid-token", "user-123");
//!
//! let result = validator.validate("valid-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use crate::domain::foundation::{
    AccountSummary, AuthError, IdentityContext, ProviderSession, SignedIn, UserId,
};
use crate::ports::{IdentityProvider, SessionValidator};

fn test_identity(user_id: &str) -> IdentityContext {
    IdentityContext::from_provider(
        UserId::new(user_id).unwrap(),
        Some(format!("{}@test.example.com", user_id)),
        Some(serde_json::json!({ "id": user_id })),
    )
}

/// Mock session validator for testing.
///
/// Stores a map of tokens to identities. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, IdentityContext>>,
    /// Optional error to return for all validations (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to an identity.
    pub fn with_identity(self, token: impl Into<String>, identity: IdentityContext) -> Self {
        self.tokens.write().unwrap().insert(token.into(), identity);
        self
    }

    /// Adds a valid token with a simple test identity.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let identity = test_identity(&user_id.into());
        self.with_identity(token, identity)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<IdentityContext, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Mock identity provider for testing the fallback path.
///
/// Unknown tokens are rejected with `InvalidToken`. Counts every call so
/// tests can assert the provider was (or was not) consulted. Password
/// accounts live in a separate map keyed by email.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    tokens: RwLock<HashMap<String, IdentityContext>>,
    accounts: RwLock<HashMap<String, (String, AccountSummary)>>,
    force_error: RwLock<Option<AuthError>>,
    calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token the provider recognises.
    pub fn with_token(self, token: impl Into<String>, identity: IdentityContext) -> Self {
        self.tokens.write().unwrap().insert(token.into(), identity);
        self
    }

    /// Adds a token with a simple test identity.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let identity = test_identity(&user_id.into());
        self.with_token(token, identity)
    }

    /// Forces every lookup to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Adds a password account that `sign_in` accepts.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let email = email.into();
        let account = AccountSummary {
            id: UserId::new(user_id).unwrap(),
            email: Some(email.clone()),
            full_name: None,
        };
        self.accounts
            .write()
            .unwrap()
            .insert(email, (password.into(), account));
        self
    }

    /// Whether an account exists for `email`.
    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.read().unwrap().contains_key(email)
    }

    fn forced_error(&self) -> Option<AuthError> {
        self.force_error.read().unwrap().clone()
    }

    /// Number of `verify_token` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<IdentityContext, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }

    async fn sign_in(&self, email: &str, password: &Secret<String>) -> Result<SignedIn, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }

        let accounts = self.accounts.read().unwrap();
        match accounts.get(email) {
            Some((stored, account)) if stored == password.expose_secret() => Ok(SignedIn {
                account: account.clone(),
                session: ProviderSession {
                    access_token: format!("mock-access-{}", account.id),
                    refresh_token: Some(format!("mock-refresh-{}", account.id)),
                },
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &Secret<String>,
        full_name: Option<&str>,
    ) -> Result<AccountSummary, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }

        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(AuthError::RegistrationRejected(
                "User already registered".to_string(),
            ));
        }

        let account = AccountSummary {
            id: UserId::new(format!("mock-user-{}", accounts.len() + 1)).unwrap(),
            email: Some(email.to_string()),
            full_name: full_name.map(str::to_string),
        };
        accounts.insert(
            email.to_string(),
            (password.expose_secret().clone(), account.clone()),
        );
        Ok(account)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
