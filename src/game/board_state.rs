//! Board state representation
//!
//! An 8×8 grid of optional pieces, addressed through [`Square`] (see
//! [`crate::game::types`] for the row/column convention). The board performs
//! no legality checks: it trusts that the move it is asked to apply came out of
//! the engine's legal move set.

use crate::game::error::{GameError, GameResult};
use crate::game::moves::{MoveKind, MoveToken};
use crate::game::types::{Piece, Square};
use std::fmt;

/// FEN piece placement of the standard start position
pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Contents of one square
pub type Occupant = Option<Piece>;

/// 8×8 grid of occupants, row 0 = rank 8
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    grid: [[Occupant; 8]; 8],
}

impl Board {
    /// Board with no pieces on it
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard start position
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for (row, rank) in START_PLACEMENT.split('/').enumerate() {
            for (col, c) in rank.chars().enumerate() {
                board.grid[row][col] = Piece::from_char(c);
            }
        }
        board
    }

    /// Build a board from the placement field of a FEN string
    ///
    /// Ranks are listed from 8 down to 1, separated by `/`; digits count
    /// empty squares.
    pub fn from_placement(placement: &str) -> GameResult<Self> {
        let invalid = || GameError::InvalidPlacement {
            placement: placement.to_string(),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid());
        }

        let mut board = Board::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or_else(invalid)?;
                    if col >= 8 {
                        return Err(invalid());
                    }
                    board.grid[row][col] = Some(piece);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(invalid());
            }
        }
        Ok(board)
    }

    /// FEN placement field describing this board
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for (row, cells) in self.grid.iter().enumerate() {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }

    pub fn get(&self, square: Square) -> Occupant {
        let (row, col) = square.grid();
        self.grid[row][col]
    }

    pub fn set(&mut self, square: Square, occupant: Occupant) {
        let (row, col) = square.grid();
        self.grid[row][col] = occupant;
    }

    /// Apply `token` to the board
    ///
    /// The move is decoded against the current position first; if decoding
    /// fails the board is left untouched.
    pub fn apply(&mut self, token: &MoveToken) -> GameResult<MoveKind> {
        let kind = MoveKind::decode(token, self)?;
        self.apply_decoded(token, kind);
        Ok(kind)
    }

    /// Apply a move whose kind was already decoded against this board
    pub(crate) fn apply_decoded(&mut self, token: &MoveToken, kind: MoveKind) {
        let moving = self.get(token.from());
        self.set(token.from(), None);

        match kind {
            MoveKind::Simple => self.set(token.to(), moving),
            MoveKind::Castle { rook_from, rook_to } => {
                self.set(token.to(), moving);
                let rook = self.get(rook_from);
                self.set(rook_from, None);
                self.set(rook_to, rook);
            }
            MoveKind::EnPassant { captured } => {
                self.set(captured, None);
                self.set(token.to(), moving);
            }
            MoveKind::Promotion(piece_type) => {
                let promoted = moving.map(|piece| Piece::new(piece.color, piece_type));
                self.set(token.to(), promoted);
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.placement())
    }
}
