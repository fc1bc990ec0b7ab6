//! Data transfer objects for service-level endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IdentityContext, StatusCheckId, Timestamp};

/// Response for `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    /// Open real-time connections.
    pub connections: usize,
}

/// Response for `GET /api/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user_id: String,
    pub email: Option<String>,
    /// Provider user record; absent for locally issued tokens.
    pub user: Option<serde_json::Value>,
}

impl From<IdentityContext> for CurrentUserResponse {
    fn from(identity: IdentityContext) -> Self {
        Self {
            user_id: identity.subject.to_string(),
            email: identity.email,
            user: identity.profile,
        }
    }
}

/// Request body for `POST /api/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStatusCheckRequest {
    pub client_name: String,
}

/// A status check record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheckResponse {
    pub id: String,
    pub client_name: String,
    pub timestamp: String,
}

impl StatusCheckResponse {
    /// A fresh check stamped now.
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            id: StatusCheckId::new().to_string(),
            client_name: client_name.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn current_user_from_local_identity_has_no_user_record() {
        let identity = IdentityContext::from_local_token(
            UserId::new("user-1").unwrap(),
            Some("u@example.com".to_string()),
        );

        let response = CurrentUserResponse::from(identity);

        assert_eq!(response.user_id, "user-1");
        assert_eq!(response.email.as_deref(), Some("u@example.com"));
        assert!(response.user.is_none());
    }

    #[test]
    fn current_user_serializes_null_fields() {
        let response = CurrentUserResponse {
            user_id: "user-1".to_string(),
            email: None,
            user: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["email"].is_null());
        assert!(json["user"].is_null());
    }

    #[test]
    fn status_check_gets_unique_ids() {
        let a = StatusCheckResponse::new("mobile-app");
        let b = StatusCheckResponse::new("mobile-app");
        assert_ne!(a.id, b.id);
        assert_eq!(a.client_name, "mobile-app");
    }
}
