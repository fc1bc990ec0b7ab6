//! HTTP adapters - REST API implementations.

pub mod account;
pub mod app;
pub mod middleware;
pub mod system;

pub use account::{account_router, AccountAppState};
pub use app::{build_app, build_cors_layer, AppState};
pub use system::{system_router, SystemAppState};
