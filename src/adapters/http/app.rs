//! Top-level router assembly.
//!
//! ```text
//! /api/*        system and account routes behind auth_middleware
//! /ws/:client_id real-time upgrade
//! ```
//!
//! Trace, CORS and timeout layers wrap everything.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, ConnectionRegistry, WebSocketState};
use crate::config::ServerConfig;
use crate::ports::IdentityProvider;

use super::account::{account_router, AccountAppState};
use super::middleware::{auth_middleware, AuthState};
use super::system::{system_router, SystemAppState};

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub validator: AuthState,
    /// Handles password sign-in and sign-up when configured.
    pub provider: Option<Arc<dyn IdentityProvider>>,
}

/// Build the full application router.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    let system = SystemAppState {
        registry: state.registry.clone(),
        app_name: server.app_name.clone(),
        app_version: server.app_version.clone(),
    };

    let accounts = AccountAppState {
        provider: state.provider,
    };

    let api = system_router()
        .with_state(system)
        .merge(account_router().with_state(accounts))
        .layer(middleware::from_fn_with_state(state.validator, auth_middleware));

    let realtime = websocket_router().with_state(WebSocketState::new(state.registry));

    Router::new()
        .nest("/api", api)
        .merge(realtime)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(build_cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// Permissive when no origins are configured.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
