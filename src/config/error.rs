//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Identity provider URL must use HTTPS in production")]
    ProviderUrlMustBeHttps,

    #[error("JWT secret key must be changed from the default in production")]
    DefaultJwtSecret,

    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedJwtAlgorithm(String),

    #[error("Access token lifetime must be between 1 minute and 1 year")]
    InvalidTokenLifetime,
}
