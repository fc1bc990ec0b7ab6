use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use smart_tour_gateway::adapters::auth::{
    parse_hmac_algorithm, FallbackSessionValidator, LocalTokenConfig, LocalTokenSigner,
    SupabaseConfig, SupabaseIdentityProvider,
};
use smart_tour_gateway::adapters::http::{build_app, AppState};
use smart_tour_gateway::adapters::websocket::ConnectionRegistry;
use smart_tour_gateway::config::{AppConfig, AuthConfig, ConfigError};
use smart_tour_gateway::ports::IdentityProvider;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unsupported JWT algorithm: {0}")]
    Algorithm(String),

    #[error("Failed to build identity provider client: {0}")]
    ProviderClient(#[from] reqwest::Error),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn load_configuration() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

/// JSON logs in production, human-readable elsewhere. `RUST_LOG` overrides
/// the configured filter.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        fmt().json().with_env_filter(filter).with_target(true).init();
    } else {
        fmt().compact().with_env_filter(filter).with_target(true).init();
    }
}

fn build_provider(
    auth: &AuthConfig,
) -> Result<Option<Arc<dyn IdentityProvider>>, StartupError> {
    match auth.provider_credentials() {
        Some((url, key)) => {
            let provider: Arc<dyn IdentityProvider> = Arc::new(SupabaseIdentityProvider::new(
                SupabaseConfig::new(url, key.expose_secret().as_str())
                    .with_timeout(auth.provider_timeout()),
            )?);
            tracing::info!(provider_url = %url, "Identity provider enabled");
            Ok(Some(provider))
        }
        None => {
            tracing::warn!(
                "No identity provider configured, accepting local tokens only; login and register are disabled"
            );
            Ok(None)
        }
    }
}

fn build_validator(
    auth: &AuthConfig,
    provider: Option<Arc<dyn IdentityProvider>>,
) -> Result<FallbackSessionValidator, StartupError> {
    let algorithm = parse_hmac_algorithm(&auth.jwt_algorithm)
        .ok_or_else(|| StartupError::Algorithm(auth.jwt_algorithm.clone()))?;

    let local = LocalTokenConfig::new(auth.jwt_secret_key.expose_secret().as_str())
        .with_algorithm(algorithm)
        .with_lifetime_minutes(auth.access_token_expire_minutes);
    let validator = FallbackSessionValidator::new(Arc::new(LocalTokenSigner::new(local)));

    Ok(match provider {
        Some(provider) => validator.with_provider(provider),
        None => validator,
    })
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    tracing::info!(
        "Starting {} v{} ({:?})",
        config.server.app_name,
        config.server.app_version,
        config.server.environment
    );

    let provider = build_provider(&config.auth)?;
    let state = AppState {
        registry: Arc::new(ConnectionRegistry::new()),
        validator: Arc::new(build_validator(&config.auth, provider.clone())?),
        provider,
    };
    let app = build_app(state, &config.server);

    let addr = config.server.resolve_addr().await?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
