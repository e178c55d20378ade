//! Type definitions and utilities for chess game logic
//!
//! Provides newtype patterns for board coordinates and the piece identity
//! stored on each square.
//!
//! # Coordinate Convention
//!
//! The board grid is addressed as `(row, col)`:
//!
//! - `row 0` is rank 8 (Black's back rank), `row 7` is rank 1
//! - `col 0` is file `a`, `col 7` is file `h`
//!
//! So `(row, col)` names the square `file('a' + col)` + `rank(8 - row)`.
//! [`Square::from_grid`] and [`Square::grid`] are the only conversions between
//! the two systems; move application and board rendering both go through them.

use std::fmt;

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(u8);

impl File {
    pub const A: File = File(0);
    pub const D: File = File(3);
    pub const F: File = File(5);
    pub const H: File = File(7);

    /// Create a file from a character ('a'..='h')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    /// Create a rank from a number (1-8)
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board square position (file, rank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    /// Create a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_number(chars.next()?.to_digit(10)? as u8)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square { file, rank })
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file.to_char(), self.rank.to_number())
    }

    /// Square at grid position `(row, col)`
    pub fn from_grid(row: usize, col: usize) -> Option<Self> {
        if row >= 8 || col >= 8 {
            return None;
        }
        Some(Square {
            file: File(col as u8),
            rank: Rank(7 - row as u8),
        })
    }

    /// Grid position `(row, col)` of this square
    pub fn grid(self) -> (usize, usize) {
        ((7 - self.rank.0) as usize, self.file.0 as usize)
    }

    /// Same square seen from the other side of the board
    pub fn flipped(self) -> Self {
        Square {
            file: File(7 - self.file.0),
            rank: Rank(7 - self.rank.0),
        }
    }

    /// Square on the same rank with a different file
    pub fn with_file(self, file: File) -> Self {
        Square {
            file,
            rank: self.rank,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_number())
    }
}

/// Side to move / piece owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PieceColor {
    #[default]
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Piece from its lower-case letter (`k q b n r p`)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'q' => Some(PieceType::Queen),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            'r' => Some(PieceType::Rook),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    /// Lower-case letter used in FEN and move tokens
    pub fn to_char(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Rook => 'r',
            PieceType::Pawn => 'p',
        }
    }

    /// Kinds a pawn may promote to
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }
}

/// Piece identity held by an occupied square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: PieceColor,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: PieceColor, piece_type: PieceType) -> Self {
        Piece { color, piece_type }
    }

    /// Piece from its FEN letter: upper case White, lower case Black
    pub fn from_char(c: char) -> Option<Self> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            PieceColor::White
        } else {
            PieceColor::Black
        };
        Some(Piece { color, piece_type })
    }

    /// FEN letter for this piece
    pub fn to_char(self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            PieceColor::White => c.to_ascii_uppercase(),
            PieceColor::Black => c,
        }
    }
}
