//! SmartTour Gateway - real-time broadcast hub for a tourism service
//!
//! Clients connect over WebSocket and push crowd and weather observations,
//! which are relayed to every open connection. HTTP endpoints verify bearer
//! credentials against a hosted identity provider, falling back to locally
//! signed tokens.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
