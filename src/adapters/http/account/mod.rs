//! HTTP adapter for password accounts.
//!
//! Both endpoints delegate to the identity provider:
//! - `POST /api/auth/login` - Password sign-in
//! - `POST /api/auth/register` - Account creation

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{AccountApiError, AccountAppState};
pub use routes::account_router;
