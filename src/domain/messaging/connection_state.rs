//! Per-connection lifecycle state.

use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle of one gateway connection.
///
/// ```text
/// Connected ──join──▶ Joined ──join──▶ Joined
///     │                  │
///     └──── disconnect ──┴──▶ Closed (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Connected,
    Joined,
    Closed,
}

impl ConnectionState {
    /// True while the connection may still issue requests.
    pub fn is_open(&self) -> bool {
        !matches!(self, ConnectionState::Closed)
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Connected, Joined) | (Joined, Joined) | (Connected, Closed) | (Joined, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Connected => vec![Joined, Closed],
            Joined => vec![Joined, Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Connected => "connected",
            ConnectionState::Joined => "joined",
            ConnectionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
