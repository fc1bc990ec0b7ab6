//! Lifecycle of a single real-time connection.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// `AwaitingConnect → Open → Closed`, with `Open → Open` per processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Handshake done, not yet in the registry.
    AwaitingConnect,
    /// Registered and receiving frames.
    Open,
    /// Disconnected or failed. Terminal.
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (AwaitingConnect, Open) | (AwaitingConnect, Closed) | (Open, Open) | (Open, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            AwaitingConnect => vec![Open, Closed],
            Open => vec![Open, Closed],
            Closed => vec![],
        }
    }
}
