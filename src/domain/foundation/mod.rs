//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types used by both the
//! real-time and authentication sides of the gateway.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{
    AccountSummary, AuthError, IdentityContext, IdentitySource, ProviderSession, SignedIn,
};
pub use errors::ValidationError;
pub use ids::{ClientId, ConnectionId, StatusCheckId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
