//! The actor state machine.

use serde::{Deserialize, Serialize};

/// One of four lifecycle states an actor occupies at any instant.
///
/// ```text
///           spawn
///   ( - ) ─────────► Ready ──pop──► Running ──tick=ready──► Ready
///                      ▲              │
///            cast/msg  │              ├──tick=blocked (mailbox empty)──► Blocked
///                      │              │                                     │
///                      └──────────────┘        cast arrives (coordinator)   │
///                                             ◄──────────────────────────── ┘
///                                             tick=done
///                                                     │
///                                                     ▼
///                                                   Dead
/// ```
///
/// Initial state: `Ready`. Terminal state: `Dead` — no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    Ready,
    Running,
    Blocked,
    Dead,
}

impl ActorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActorState::Dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_is_the_only_terminal_state() {
        assert!(ActorState::Dead.is_terminal());
        assert!(!ActorState::Ready.is_terminal());
        assert!(!ActorState::Running.is_terminal());
        assert!(!ActorState::Blocked.is_terminal());
    }
}
