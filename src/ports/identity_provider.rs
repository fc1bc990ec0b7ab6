//! Identity provider port - the external auth service.
//!
//! The gateway never implements an authentication protocol itself. It asks
//! a hosted identity service whether a bearer token belongs to a user, and
//! hands password sign-in and sign-up straight to that service.
//!
//! # Contract
//!
//! Implementations must:
//! - Return the identity when the provider recognises the token
//! - Return `AuthError::InvalidToken` when the provider rejects it
//! - Return `AuthError::InvalidCredentials` when a sign-in is refused
//! - Return `AuthError::RegistrationRejected` when a sign-up is refused
//! - Return `AuthError::ServiceUnavailable` for network errors, non-success
//!   statuses other than rejection, and unparseable responses

use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::foundation::{AccountSummary, AuthError, IdentityContext, SignedIn};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask the provider who owns `token`.
    async fn verify_token(&self, token: &str) -> Result<IdentityContext, AuthError>;

    /// Exchange an email and password for a provider session.
    async fn sign_in(&self, email: &str, password: &Secret<String>) -> Result<SignedIn, AuthError>;

    /// Create an account. `full_name` is stored as user metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &Secret<String>,
        full_name: Option<&str>,
    ) -> Result<AccountSummary, AuthError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_provider_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn IdentityProvider) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn IdentityProvider>>();
    }
}
