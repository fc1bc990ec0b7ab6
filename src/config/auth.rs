//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::auth::parse_hmac_algorithm;

use super::error::ValidationError;
use super::server::Environment;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 60 * 24 * 365;

/// Placeholder signing key used when none is configured.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

/// Authentication configuration (hosted provider plus local tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Identity provider base URL. Unset disables the provider step.
    pub supabase_url: Option<String>,

    /// Public API key sent with every provider lookup
    pub supabase_anon_key: Option<Secret<String>>,

    /// HMAC key for locally issued tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret_key: Secret<String>,

    /// HS256, HS384 or HS512
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,

    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,

    /// Timeout for a single provider lookup in seconds
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

impl AuthConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Provider URL and key, when both are set.
    pub fn provider_credentials(&self) -> Option<(&str, &Secret<String>)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) if !url.is_empty() => Some((url.as_str(), key)),
            _ => None,
        }
    }

    /// Validate authentication configuration
    ///
    /// In production, requires an HTTPS provider URL and a non-default
    /// signing key.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET_KEY"));
        }
        if parse_hmac_algorithm(&self.jwt_algorithm).is_none() {
            return Err(ValidationError::UnsupportedJwtAlgorithm(
                self.jwt_algorithm.clone(),
            ));
        }
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&self.access_token_expire_minutes) {
            return Err(ValidationError::InvalidTokenLifetime);
        }
        if self.provider_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.supabase_url.is_some() && self.supabase_anon_key.is_none() {
            return Err(ValidationError::MissingRequired("SUPABASE_ANON_KEY"));
        }

        if *environment == Environment::Production {
            if let Some(url) = &self.supabase_url {
                if !url.starts_with("https://") {
                    return Err(ValidationError::ProviderUrlMustBeHttps);
                }
            }
            if self.jwt_secret_key.expose_secret() == DEFAULT_JWT_SECRET {
                return Err(ValidationError::DefaultJwtSecret);
            }
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            jwt_secret_key: default_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            access_token_expire_minutes: default_access_token_expire_minutes(),
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_jwt_secret() -> Secret<String> {
    Secret::new(DEFAULT_JWT_SECRET.to_string())
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_provider_timeout() -> u64 {
    10
}
