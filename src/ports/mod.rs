//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionValidator` - Bearer token → identity, as seen by handlers
//! - `IdentityProvider` - The hosted auth service consulted first
//! - `MessageSink` - Write half of a live client connection

mod identity_provider;
mod message_sink;
mod session_validator;

pub use identity_provider::IdentityProvider;
pub use message_sink::MessageSink;
pub use session_validator::SessionValidator;
