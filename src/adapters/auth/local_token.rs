//! Locally signed access tokens.
//!
//! The gateway can issue its own HMAC-signed JWTs. They are the second
//! verification step: when the identity provider does not accept a bearer
//! token, it is decoded here instead.
//!
//! Claims: `sub`, optional `email`, `iat`, `exp`. Expiry is checked with no
//! leeway.

use std::str::FromStr;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, IdentityContext, Timestamp, UserId};

/// Claims carried by a locally issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalClaims {
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub iat: Option<i64>,

    pub exp: i64,
}

/// Configuration for [`LocalTokenSigner`].
#[derive(Debug, Clone)]
pub struct LocalTokenConfig {
    secret: Secret<String>,
    /// HMAC algorithm (HS256, HS384 or HS512).
    pub algorithm: Algorithm,
    /// Lifetime of issued tokens in minutes.
    pub lifetime_minutes: i64,
}

impl LocalTokenConfig {
    /// HS256 with a 30 minute lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            algorithm: Algorithm::HS256,
            lifetime_minutes: 30,
        }
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the token lifetime.
    pub fn with_lifetime_minutes(mut self, minutes: i64) -> Self {
        self.lifetime_minutes = minutes;
        self
    }
}

/// Parses an HMAC algorithm name, rejecting asymmetric algorithms.
pub fn parse_hmac_algorithm(name: &str) -> Option<Algorithm> {
    match Algorithm::from_str(name).ok()? {
        alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => Some(alg),
        _ => None,
    }
}

/// Issues and decodes locally signed tokens.
pub struct LocalTokenSigner {
    config: LocalTokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl LocalTokenSigner {
    pub fn new(config: LocalTokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for `subject` valid for the configured lifetime.
    pub fn issue(&self, subject: &UserId, email: Option<&str>) -> Result<String, AuthError> {
        let now = Timestamp::now();
        self.issue_at(subject, email, now, now.plus_minutes(self.config.lifetime_minutes))
    }

    /// Issue a token with explicit issue and expiry times.
    pub fn issue_at(
        &self,
        subject: &UserId,
        email: Option<&str>,
        issued_at: Timestamp,
        expires_at: Timestamp,
    ) -> Result<String, AuthError> {
        let claims = LocalClaims {
            sub: subject.to_string(),
            email: email.map(str::to_string),
            iat: Some(issued_at.as_unix_secs()),
            exp: expires_at.as_unix_secs(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign local token: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Decode and verify a token.
    ///
    /// Expired signatures map to `TokenExpired`; every other failure,
    /// including an empty subject, maps to `InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<IdentityContext, AuthError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = 0;

        let data = decode::<LocalClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!("Local token rejected: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let subject = UserId::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(IdentityContext::from_local_token(subject, data.claims.email))
    }
}
