//! Integration tests for the HTTP surface.
//!
//! These tests run the assembled application router with the real fallback
//! validator (local tokens plus a mock identity provider) and check:
//! 1. Protected routes accept provider and locally signed tokens
//! 2. Every credential failure produces the same 401 response
//! 3. Public service endpoints respond without credentials
//! 4. Login and registration are delegated to the identity provider

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use smart_tour_gateway::adapters::auth::{
    FallbackSessionValidator, LocalTokenConfig, LocalTokenSigner, MockIdentityProvider,
};
use smart_tour_gateway::adapters::http::{build_app, AppState};
use smart_tour_gateway::adapters::websocket::ConnectionRegistry;
use smart_tour_gateway::config::ServerConfig;
use smart_tour_gateway::domain::foundation::{AuthError, IdentityContext, Timestamp, UserId};
use smart_tour_gateway::ports::IdentityProvider;

// =============================================================================
// Test Infrastructure
// =============================================================================

const SECRET: &str = "integration-secret";

fn signer() -> Arc<LocalTokenSigner> {
    Arc::new(LocalTokenSigner::new(LocalTokenConfig::new(SECRET)))
}

fn app_with(provider: MockIdentityProvider) -> Router {
    let provider: Arc<dyn IdentityProvider> = Arc::new(provider);
    let validator = FallbackSessionValidator::new(signer()).with_provider(provider.clone());
    let state = AppState {
        registry: Arc::new(ConnectionRegistry::new()),
        validator: Arc::new(validator),
        provider: Some(provider),
    };
    build_app(state, &ServerConfig::default())
}

fn app() -> Router {
    let provider = MockIdentityProvider::new()
        .with_account("layla@example.com", "petra-2025", "sb-user")
        .with_token(
            "provider-token",
            IdentityContext::from_provider(
                UserId::new("sb-user").unwrap(),
                Some("sb@example.com".to_string()),
                Some(json!({"id": "sb-user", "role": "authenticated"})),
            ),
        );
    app_with(provider)
}

async fn get(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();

    let status = response.status();
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, challenge)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn assert_uniform_rejection(status: StatusCode, body: &Value, challenge: Option<String>) {
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        &json!({"error": "Could not validate credentials", "code": "UNAUTHENTICATED"})
    );
    assert_eq!(challenge.as_deref(), Some("Bearer"));
}

// =============================================================================
// /api/auth/me
// =============================================================================

#[tokio::test]
async fn me_with_provider_token_returns_provider_record() {
    let (status, body, _) = get(app(), "/api/auth/me", Some("provider-token")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "sb-user");
    assert_eq!(body["email"], "sb@example.com");
    assert_eq!(body["user"]["role"], "authenticated");
}

#[tokio::test]
async fn me_with_local_token_falls_back() {
    let token = signer()
        .issue(&UserId::new("local-user").unwrap(), Some("local@example.com"))
        .unwrap();

    let (status, body, _) = get(app(), "/api/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "local-user");
    assert_eq!(body["email"], "local@example.com");
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn me_survives_provider_outage() {
    let token = signer().issue(&UserId::new("local-user").unwrap(), None).unwrap();
    let app = app_with(
        MockIdentityProvider::new().with_error(AuthError::service_unavailable("connect timeout")),
    );

    let (status, body, _) = get(app, "/api/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "local-user");
}

#[tokio::test]
async fn me_without_token_is_rejected() {
    let (status, body, challenge) = get(app(), "/api/auth/me", None).await;
    assert_uniform_rejection(status, &body, challenge);
}

#[tokio::test]
async fn expired_and_forged_tokens_look_identical() {
    let now = Timestamp::now();
    let expired = signer()
        .issue_at(
            &UserId::new("local-user").unwrap(),
            None,
            now.plus_minutes(-60),
            now.plus_minutes(-1),
        )
        .unwrap();
    let forged = LocalTokenSigner::new(LocalTokenConfig::new("wrong-secret"))
        .issue(&UserId::new("local-user").unwrap(), None)
        .unwrap();

    let expired_response = get(app(), "/api/auth/me", Some(&expired)).await;
    let forged_response = get(app(), "/api/auth/me", Some(&forged)).await;

    assert_uniform_rejection(expired_response.0, &expired_response.1, expired_response.2);
    assert_uniform_rejection(forged_response.0, &forged_response.1, forged_response.2);
}

// =============================================================================
// /api/auth/login and /api/auth/register
// =============================================================================

#[tokio::test]
async fn login_returns_provider_session() {
    let (status, body) = post_json(
        app(),
        "/api/auth/login",
        json!({"email": "layla@example.com", "password": "petra-2025"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "mock-access-sb-user");
    assert_eq!(body["refresh_token"], "mock-refresh-sb-user");
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["id"], "sb-user");
    assert_eq!(body["user"]["email"], "layla@example.com");
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let (status, body) = post_json(
        app(),
        "/api/auth/login",
        json!({"email": "layla@example.com", "password": "wrong"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect email or password");
}

#[tokio::test]
async fn register_returns_new_account() {
    let (status, body) = post_json(
        app(),
        "/api/auth/register",
        json!({"email": "omar@example.com", "password": "wadi-rum", "full_name": "Omar"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["email"], "omar@example.com");
    assert_eq!(body["user"]["full_name"], "Omar");
}

#[tokio::test]
async fn register_existing_email_is_400() {
    let (status, body) = post_json(
        app(),
        "/api/auth/register",
        json!({"email": "layla@example.com", "password": "another"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Registration failed");
}

#[tokio::test]
async fn login_without_provider_is_503() {
    let state = AppState {
        registry: Arc::new(ConnectionRegistry::new()),
        validator: Arc::new(FallbackSessionValidator::new(signer())),
        provider: None,
    };
    let app = build_app(state, &ServerConfig::default());

    let (status, _) = post_json(
        app,
        "/api/auth/login",
        json!({"email": "layla@example.com", "password": "petra-2025"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn health_reports_version_and_connections() {
    let (status, body, _) = get(app(), "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["connections"], 0);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn health_ignores_bad_credentials() {
    let (status, _, _) = get(app(), "/api/health", Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_list_contains_service_entry() {
    let (status, body, _) = get(app(), "/api/status", None).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["client_name"], "SmartTour.Jo API");
}

#[tokio::test]
async fn create_status_check_echoes_client_name() {
    let response = app()
        .oneshot(
            Request::post("/api/status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"client_name":"mobile-app"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["client_name"], "mobile-app");
    assert!(uuid_like(body["id"].as_str().unwrap()));
}

#[tokio::test]
async fn create_status_check_rejects_blank_name() {
    let response = app()
        .oneshot(
            Request::post("/api/status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"client_name":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}
