//! Terminal collaborators
//!
//! [`TextBoardRenderer`] prints the board as letters (upper case White, lower
//! case Black) with file and rank labels; [`ConsoleInput`] reads one
//! whitespace-separated token per prompt.

use crate::game::board_state::Board;
use crate::game::types::Square;
use crate::ui::{BoardRenderer, MoveSource};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Prints the board as an 8×8 letter grid
pub struct TextBoardRenderer<W: Write> {
    out: W,
    flipped: bool,
}

impl<W: Write> TextBoardRenderer<W> {
    /// `flipped` puts rank 8 at the bottom (Black's view)
    pub fn new(out: W, flipped: bool) -> Self {
        Self { out, flipped }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BoardRenderer for TextBoardRenderer<W> {
    fn render(&mut self, board: &Board) {
        let text = render_text(board, self.flipped);
        // rendering is best effort; a closed stdout must not end the game
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

/// Board as text, one rank per line
///
/// Screen cells go through [`Square::from_grid`], and through
/// [`Square::flipped`] when `flipped` is set, so rendering shares the
/// coordinate mapping used by move application. Labels come from the squares
/// themselves.
pub fn render_text(board: &Board, flipped: bool) -> String {
    let screen_row = |row: usize| {
        (0..8)
            .filter_map(move |col| Square::from_grid(row, col))
            .map(move |square| if flipped { square.flipped() } else { square })
    };

    let mut out = String::with_capacity(200);
    for row in 0..8 {
        let squares: Vec<Square> = screen_row(row).collect();
        if let Some(first) = squares.first() {
            out.push_str(&first.rank.to_number().to_string());
            out.push(' ');
        }
        for square in squares {
            out.push(' ');
            out.push(board.get(square).map_or('.', |piece| piece.to_char()));
        }
        out.push('\n');
    }
    out.push_str("  ");
    for square in screen_row(7) {
        out.push(' ');
        out.push(square.file.to_char());
    }
    out.push('\n');
    out
}

const PROMPT: &str = "Your move: ";

/// Reads move tokens from a line-oriented input
pub struct ConsoleInput<R: BufRead, W: Write> {
    input: R,
    out: W,
    queued: VecDeque<String>,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            queued: VecDeque::new(),
        }
    }
}

impl<R: BufRead, W: Write> MoveSource for ConsoleInput<R, W> {
    fn next_move(&mut self) -> std::io::Result<Option<String>> {
        loop {
            if let Some(token) = self.queued.pop_front() {
                return Ok(Some(token));
            }
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.queued.extend(
                String::from_utf8_lossy(&line)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }

    fn reject(&mut self, reason: &str) {
        let _ = writeln!(self.out, "{reason}");
    }

    fn announce(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }
}
