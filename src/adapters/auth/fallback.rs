//! Two-step credential verification.
//!
//! Step one asks the external identity provider. If the provider does not
//! confirm the token, for any reason, step two decodes it as a locally
//! signed token. Provider outages are absorbed here: callers only ever see
//! `InvalidToken` or `TokenExpired`.
//!
//! ```text
//! token ──► provider ──Verified──────────────► IdentityContext (Provider)
//!              │
//!              ├─Rejected / Unavailable / Skipped
//!              ▼
//!          local signer ──ok──► IdentityContext (LocalToken)
//!              └─err──► InvalidToken | TokenExpired
//! ```
//!
//! # Example
//!
//! ```ignore
//! let local = Arc::new(LocalTokenSigner::new(LocalTokenConfig::new(secret)));
//! let validator = FallbackSessionValidator::new(local)
//!     .with_provider(Arc::new(SupabaseIdentityProvider::new(config)?));
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, IdentityContext};
use crate::ports::{IdentityProvider, SessionValidator};

use super::LocalTokenSigner;

/// Outcome of the provider step.
#[derive(Debug, Clone)]
pub enum ProviderCheck {
    /// Provider confirmed the token.
    Verified(IdentityContext),
    /// Provider answered and said no.
    Rejected,
    /// Provider could not be asked or gave an unusable answer.
    Unavailable(String),
    /// No provider configured.
    Skipped,
}

/// Session validator chaining the identity provider and the local signer.
pub struct FallbackSessionValidator {
    provider: Option<Arc<dyn IdentityProvider>>,
    local: Arc<LocalTokenSigner>,
}

impl FallbackSessionValidator {
    /// Validator that only checks locally signed tokens.
    pub fn new(local: Arc<LocalTokenSigner>) -> Self {
        Self {
            provider: None,
            local,
        }
    }

    /// Adds the identity provider consulted before the local signer.
    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Step one: ask the provider.
    pub async fn check_provider(&self, token: &str) -> ProviderCheck {
        let Some(provider) = &self.provider else {
            return ProviderCheck::Skipped;
        };

        match provider.verify_token(token).await {
            Ok(identity) => ProviderCheck::Verified(identity),
            Err(AuthError::ServiceUnavailable(reason)) => {
                tracing::warn!(
                    provider = provider.name(),
                    %reason,
                    "Identity provider unavailable, trying local verification"
                );
                ProviderCheck::Unavailable(reason)
            }
            Err(_) => {
                tracing::debug!(
                    provider = provider.name(),
                    "Provider rejected token, trying local verification"
                );
                ProviderCheck::Rejected
            }
        }
    }

    /// Step two: decode a locally signed token.
    pub fn check_local(&self, token: &str) -> Result<IdentityContext, AuthError> {
        match self.local.decode(token) {
            Ok(identity) => Ok(identity),
            Err(AuthError::TokenExpired) => Err(AuthError::TokenExpired),
            Err(_) => Err(AuthError::InvalidToken),
        }
    }
}

#[async_trait]
impl SessionValidator for FallbackSessionValidator {
    async fn validate(&self, token: &str) -> Result<IdentityContext, AuthError> {
        match self.check_provider(token).await {
            ProviderCheck::Verified(identity) => Ok(identity),
            ProviderCheck::Rejected | ProviderCheck::Unavailable(_) | ProviderCheck::Skipped => {
                self.check_local(token)
            }
        }
    }
}
