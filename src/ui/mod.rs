//! Presentation collaborators
//!
//! The game loop talks to the outside world through two traits:
//!
//! - [`BoardRenderer`] receives a read-only board after every mutation
//! - [`MoveSource`] supplies the user's move tokens (or `quit`) and receives
//!   one-line feedback
//!
//! [`console`] implements both for a plain terminal.

pub mod console;

use crate::game::board_state::Board;

/// Draws the board; called after every mutation
pub trait BoardRenderer {
    fn render(&mut self, board: &Board);
}

/// Supplies user moves and shows short messages
pub trait MoveSource {
    /// Next token typed by the user; `None` once input is exhausted
    fn next_move(&mut self) -> std::io::Result<Option<String>>;

    /// Explain why the last token was not accepted
    fn reject(&mut self, reason: &str);

    /// Informational line (engine ready, engine moved, …)
    fn announce(&mut self, _message: &str) {}
}

pub use console::{ConsoleInput, TextBoardRenderer};
