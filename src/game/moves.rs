//! Move tokens and decoded move kinds
//!
//! A [`MoveToken`] is the engine protocol's long-algebraic move:
//! `<fromFile><fromRank><toFile><toRank>[promotion]`, e.g. `e2e4` or `e7e8q`.
//! Tokens are immutable once parsed.
//!
//! A token alone does not say whether it is a castle or an en passant
//! capture; [`MoveKind::decode`] looks at the board to find out, so that
//! [`crate::game::board_state::Board::apply`] can run one rule per kind.

use crate::game::board_state::Board;
use crate::game::error::{GameError, GameResult};
use crate::game::types::{File, PieceType, Square};
use std::fmt;
use std::str::FromStr;

/// Long-algebraic move token as exchanged with the engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveToken {
    text: String,
    from: Square,
    to: Square,
    promotion: Option<PieceType>,
}

impl MoveToken {
    /// Parse a 4- or 5-character token
    pub fn parse(token: &str) -> GameResult<Self> {
        let malformed = || GameError::MalformedMove {
            token: token.to_string(),
        };

        if !token.is_ascii() || !(4..=5).contains(&token.len()) {
            return Err(malformed());
        }

        let from = Square::from_algebraic(&token[0..2]).ok_or_else(malformed)?;
        let to = Square::from_algebraic(&token[2..4]).ok_or_else(malformed)?;
        let promotion = match token[4..].chars().next() {
            None => None,
            Some(c) => Some(
                PieceType::from_char(c)
                    .filter(|kind| c.is_ascii_lowercase() && kind.is_promotion_target())
                    .ok_or_else(malformed)?,
            ),
        };

        Ok(MoveToken {
            text: token.to_string(),
            from,
            to,
            promotion,
        })
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    /// Piece kind named by the 5th character, if any
    pub fn promotion(&self) -> Option<PieceType> {
        self.promotion
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for MoveToken {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveToken::parse(s)
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for MoveToken {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// How a move changes the board, beyond moving one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Plain relocation, possibly onto an enemy piece
    Simple,
    /// King moved two files; the rook jumps over it
    Castle { rook_from: Square, rook_to: Square },
    /// Pawn moved diagonally onto an empty square; the pawn it passed is taken
    EnPassant { captured: Square },
    /// Pawn reached the last rank and becomes `PieceType`
    Promotion(PieceType),
}

impl MoveKind {
    /// Classify `token` against the position on `board`
    ///
    /// Fails only if the source square is empty. No legality check is made.
    pub fn decode(token: &MoveToken, board: &Board) -> GameResult<Self> {
        let from = token.from();
        let to = token.to();
        let piece = board.get(from).ok_or_else(|| GameError::EmptySquare {
            square: from.to_algebraic(),
        })?;

        if let Some(kind) = token.promotion() {
            return Ok(MoveKind::Promotion(kind));
        }

        let file_delta = to.file.index() as i8 - from.file.index() as i8;
        match piece.piece_type {
            PieceType::King if file_delta.abs() == 2 && from.rank == to.rank => {
                let (rook_file, landing_file) = if file_delta > 0 {
                    (File::H, File::F)
                } else {
                    (File::A, File::D)
                };
                Ok(MoveKind::Castle {
                    rook_from: from.with_file(rook_file),
                    rook_to: from.with_file(landing_file),
                })
            }
            PieceType::Pawn if file_delta != 0 && board.get(to).is_none() => {
                Ok(MoveKind::EnPassant {
                    captured: from.with_file(to.file),
                })
            }
            _ => Ok(MoveKind::Simple),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> MoveToken {
        MoveToken::parse(s).unwrap()
    }

    #[test]
    fn test_parse_plain_move() {
        let mv = token("e2e4");
        assert_eq!(mv.from().to_algebraic(), "e2");
        assert_eq!(mv.to().to_algebraic(), "e4");
        assert_eq!(mv.promotion(), None);
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn test_parse_promotion_suffix() {
        let mv = token("a7a8q");
        assert_eq!(mv.promotion(), Some(PieceType::Queen));
        assert_eq!(token("b2b1n").promotion(), Some(PieceType::Knight));
    }

    #[test]
    fn test_reject_malformed_tokens() {
        for bad in ["", "e2", "e2e", "e2e9", "i2e4", "e2e4k", "e2e4Q", "e2e4qq", "quit", "é2e4"] {
            assert!(
                matches!(MoveToken::parse(bad), Err(GameError::MalformedMove { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_simple_from_start() {
        let board = Board::starting();
        assert_eq!(MoveKind::decode(&token("e2e4"), &board).unwrap(), MoveKind::Simple);
        assert_eq!(MoveKind::decode(&token("g1f3"), &board).unwrap(), MoveKind::Simple);
    }

    #[test]
    fn test_decode_empty_source_fails() {
        let board = Board::starting();
        let err = MoveKind::decode(&token("e4e5"), &board).unwrap_err();
        assert!(matches!(err, GameError::EmptySquare { ref square } if square == "e4"));
    }

    #[test]
    fn test_decode_castles() {
        let board = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let short = MoveKind::decode(&token("e1g1"), &board).unwrap();
        assert_eq!(
            short,
            MoveKind::Castle {
                rook_from: Square::from_algebraic("h1").unwrap(),
                rook_to: Square::from_algebraic("f1").unwrap(),
            }
        );

        let long = MoveKind::decode(&token("e8c8"), &board).unwrap();
        assert_eq!(
            long,
            MoveKind::Castle {
                rook_from: Square::from_algebraic("a8").unwrap(),
                rook_to: Square::from_algebraic("d8").unwrap(),
            }
        );
    }

    #[test]
    fn test_decode_en_passant_only_onto_empty_square() {
        let board = Board::from_placement("8/8/8/3pP3/8/8/8/8").unwrap();
        assert_eq!(
            MoveKind::decode(&token("e5d6"), &board).unwrap(),
            MoveKind::EnPassant {
                captured: Square::from_algebraic("d5").unwrap()
            }
        );

        let capture = Board::from_placement("8/8/3n4/4P3/8/8/8/8").unwrap();
        assert_eq!(MoveKind::decode(&token("e5d6"), &capture).unwrap(), MoveKind::Simple);
    }
}
