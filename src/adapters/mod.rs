//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Identity provider, local token signer, fallback validator
//! - `http` - REST routes and auth middleware
//! - `websocket` - Connection registry, event router, upgrade handler

pub mod auth;
pub mod http;
pub mod websocket;
