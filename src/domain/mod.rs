//! Domain layer containing gateway types with no I/O.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, identity, errors)
//! - `realtime` - Event envelopes and connection lifecycle for the live relay

pub mod foundation;
pub mod realtime;
