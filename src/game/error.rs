//! Error types for game module
//!
//! Provides custom error types for game logic including move validation,
//! move decoding, and engine synchronization.

use crate::engine::EngineError;
use crate::game::turn_state::TurnState;

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// User-supplied move is not in the current legal move set
    #[error("Illegal move: {token}")]
    IllegalMoveRejected { token: String },

    /// Token does not have the `<file><rank><file><rank>[piece]` shape
    #[error("Malformed move token '{token}'")]
    MalformedMove { token: String },

    /// Move source square holds no piece
    #[error("No piece on {square}")]
    EmptySquare { square: String },

    /// FEN piece placement could not be parsed
    #[error("Invalid piece placement '{placement}'")]
    InvalidPlacement { placement: String },

    /// Engine answered with a move outside its own legal move set
    #[error("Engine played '{token}', which is not legal in the current position")]
    EngineMoveNotLegal { token: String },

    /// Operation called in the wrong phase of the turn loop
    #[error("Invalid game state transition: {from} -> {to}")]
    InvalidStateTransition { from: TurnState, to: TurnState },

    /// Console collaborator failed to read or write
    #[error("Console I/O error: {0}")]
    Console(#[from] std::io::Error),

    /// Transport, process or protocol failure while talking to the engine
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl GameError {
    /// Whether the turn loop can continue after this error
    ///
    /// Move validation failures are local and re-prompt; anything coming
    /// from the engine session ends the game.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::IllegalMoveRejected { .. } | GameError::MalformedMove { .. }
        )
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
