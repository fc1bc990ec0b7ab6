//! Real-time relay domain: event envelopes, connection lifecycle, errors.

mod errors;
mod events;
mod state;

pub use errors::RealtimeError;
pub use events::{EventKind, InboundEvent, OutboundEvent};
pub use state::ConnectionState;
