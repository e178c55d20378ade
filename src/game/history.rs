//! Move history tracking
//!
//! Maintains the chronological, append-only record of every half-move played
//! since the start position. The history is the only state replayed to the
//! engine: every query starts with `position startpos moves <history>`.
//!
//! # Integration
//!
//! Appended only by [`crate::game::position::GamePosition::play`], together
//! with the board mutation, so the two can never drift apart.

use crate::game::moves::MoveToken;
use crate::game::types::PieceColor;

/// Ordered list of all half-moves played in the current game
///
/// Index 0 = White's first move, index 1 = Black's reply, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<MoveToken>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a half-move
    pub(crate) fn push(&mut self, token: MoveToken) {
        self.moves.push(token);
    }

    /// Most recent move, `None` at game start
    pub fn last_move(&self) -> Option<&MoveToken> {
        self.moves.last()
    }

    /// Number of half-moves (ply) played
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Move at ply `index` (0 = first move)
    pub fn get_move(&self, index: usize) -> Option<&MoveToken> {
        self.moves.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveToken> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[MoveToken] {
        &self.moves
    }

    /// Side to move after the recorded moves, assuming White started
    pub fn side_to_move(&self) -> PieceColor {
        if self.moves.len() % 2 == 0 {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }

    /// Moves joined by single spaces, as the engine expects them
    pub fn to_uci_list(&self) -> String {
        self.moves
            .iter()
            .map(MoveToken::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a MoveToken;
    type IntoIter = std::slice::Iter<'a, MoveToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
