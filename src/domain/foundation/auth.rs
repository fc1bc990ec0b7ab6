//! Authentication types for the domain layer.
//!
//! An [`IdentityContext`] is what a verified bearer credential turns into.
//! It carries no provider types, so the external identity service and the
//! locally signed fallback token both populate the same struct.
//!
//! # Design Decisions
//!
//! - `IdentityContext` is ephemeral: built per request, never persisted
//! - `AuthError` is domain-centric, not provider-specific
//! - The verification step that produced an identity is recorded in
//!   [`IdentitySource`] so both paths can be asserted on independently

use serde::Serialize;
use thiserror::Error;

use super::UserId;

/// Which verification step accepted the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// The external identity provider recognised the token.
    Provider,
    /// The provider did not; a self-issued signed token was accepted instead.
    LocalToken,
}

/// Verified identity attributes derived from a bearer credential.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    /// Subject identifier (`sub` claim or provider user ID).
    pub subject: UserId,

    /// Email address, when the credential carries one.
    pub email: Option<String>,

    /// Full user record returned by the identity provider.
    ///
    /// Always `None` for locally signed tokens.
    pub profile: Option<serde_json::Value>,

    /// Step that produced this identity.
    pub source: IdentitySource,
}

impl IdentityContext {
    /// Identity confirmed by the external provider.
    pub fn from_provider(
        subject: UserId,
        email: Option<String>,
        profile: Option<serde_json::Value>,
    ) -> Self {
        Self {
            subject,
            email,
            profile,
            source: IdentitySource::Provider,
        }
    }

    /// Identity recovered from a locally signed token.
    pub fn from_local_token(subject: UserId, email: Option<String>) -> Self {
        Self {
            subject,
            email,
            profile: None,
            source: IdentitySource::LocalToken,
        }
    }
}

/// Account details the identity provider reports after sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: UserId,
    pub email: Option<String>,
    /// `full_name` from the provider's user metadata.
    pub full_name: Option<String>,
}

/// A session the identity provider opened for a password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Outcome of a successful password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub account: AccountSummary,
    pub session: ProviderSession,
}

/// Authentication errors that can occur during credential verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Malformed token, bad signature, or rejected by every verification step.
    #[error("Invalid token")]
    InvalidToken,

    /// Signature is valid but the expiry has elapsed.
    #[error("Token expired")]
    TokenExpired,

    /// The provider refused an email and password pair.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The provider refused to create an account.
    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    /// The identity provider could not be reached or answered garbage.
    ///
    /// Only ever seen between a provider adapter and the verifier, which
    /// absorbs it and falls back to local verification.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
