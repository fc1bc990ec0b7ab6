//! HTTP adapter for service-level endpoints.
//!
//! - `GET /api/` - Welcome message
//! - `GET /api/health` - Health check
//! - `GET /api/auth/me` - Current identity
//! - `GET /api/status`, `POST /api/status` - Legacy status checks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{SystemApiError, SystemAppState};
pub use routes::system_router;
