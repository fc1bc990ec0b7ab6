//! Session validation port for bearer credential verification.
//!
//! This is the contract HTTP middleware and the real-time endpoint use to
//! turn a bearer token into an [`IdentityContext`]. It is provider-agnostic:
//! the production implementation chains the external identity provider with
//! a locally signed token fallback, and tests use a mock.
//!
//! # Example Implementation
//!
//! ```ignore
//! #[async_trait]
//! impl SessionValidator for FallbackSessionValidator {
//!     async fn validate(&self, token: &str) -> Result<IdentityContext, AuthError> {
//!         // 1. Ask the identity provider
//!         // 2. On any provider failure, decode a locally signed token
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, IdentityContext};

/// Validates bearer tokens and extracts identity.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for malformed or bad-signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Never surface `AuthError::ServiceUnavailable` to callers
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<IdentityContext, AuthError>;

    /// Optional-auth variant.
    ///
    /// Missing and invalid credentials both yield `None`; callers cannot
    /// tell an anonymous request from a bad credential through this method.
    async fn validate_optional(&self, token: Option<&str>) -> Option<IdentityContext> {
        match token {
            Some(token) => self.validate(token).await.ok(),
            None => None,
        }
    }
}
