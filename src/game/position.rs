//! Board and move history kept in lockstep
//!
//! [`GamePosition`] is the only place either half is mutated. `play` decodes
//! the move against the board first; only when that succeeds are the board
//! and the history updated together, so replaying the history from the start
//! position always reproduces the board.

use crate::game::board_state::Board;
use crate::game::error::GameResult;
use crate::game::history::MoveHistory;
use crate::game::moves::{MoveKind, MoveToken};
use crate::game::types::PieceColor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePosition {
    board: Board,
    history: MoveHistory,
}

impl Default for GamePosition {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePosition {
    /// Start position with an empty history
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            history: MoveHistory::new(),
        }
    }

    /// Rebuild a position by playing `moves` from the start position
    pub fn replay<'a, I>(moves: I) -> GameResult<Self>
    where
        I: IntoIterator<Item = &'a MoveToken>,
    {
        let mut position = GamePosition::new();
        for token in moves {
            position.play(token.clone())?;
        }
        Ok(position)
    }

    /// Apply `token` to the board and append it to the history
    pub fn play(&mut self, token: MoveToken) -> GameResult<MoveKind> {
        let kind = MoveKind::decode(&token, &self.board)?;
        self.board.apply_decoded(&token, kind);
        self.history.push(token);
        Ok(kind)
    }

    /// Read-only view of the board for renderers
    pub fn current_board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn side_to_move(&self) -> PieceColor {
        self.history.side_to_move()
    }
}
