//! Turn state machine
//!
//! Tracks where the game loop is within a round, so that each operation of
//! the Turn Controller can check it is being called at the right time.

use std::fmt;

/// Phase of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnState {
    /// Engine started, `uciok` / `readyok` not yet seen
    ///
    /// Valid transitions: → AwaitingUserMove, → Terminated
    #[default]
    AwaitingHandshake,

    /// Waiting for the console to supply a move or `quit`
    ///
    /// Valid transitions: → UserMoveApplied, → Terminated
    AwaitingUserMove,

    /// User move applied to board and history
    ///
    /// Valid transitions: → AwaitingEngineMove
    UserMoveApplied,

    /// Engine is searching for its reply
    ///
    /// Valid transitions: → EngineMoveApplied, → Terminated
    AwaitingEngineMove,

    /// Engine move applied to board and history
    ///
    /// Valid transitions: → AwaitingUserMove
    EngineMoveApplied,

    /// Session closed; terminal state
    Terminated,
}

impl TurnState {
    /// Whether the state machine allows `self → next`
    pub fn can_transition_to(self, next: TurnState) -> bool {
        use TurnState::*;
        matches!(
            (self, next),
            (AwaitingHandshake, AwaitingUserMove)
                | (AwaitingHandshake, Terminated)
                | (AwaitingUserMove, UserMoveApplied)
                | (AwaitingUserMove, Terminated)
                | (UserMoveApplied, AwaitingEngineMove)
                | (AwaitingEngineMove, EngineMoveApplied)
                | (AwaitingEngineMove, Terminated)
                | (EngineMoveApplied, AwaitingUserMove)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TurnState::Terminated)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
