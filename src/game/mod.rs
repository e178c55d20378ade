//! Game state and turn loop
//!
//! Pure board bookkeeping plus the controller that keeps it in step with the
//! engine. No chess rules live here: legality comes from the engine through a
//! [`LegalityOracle`], and the board only knows how to replay moves.
//!
//! # Module Organization
//!
//! - `types` - Files, ranks, squares and pieces
//! - `moves` - Move tokens and their decoded [`MoveKind`]
//! - `board_state` - 8×8 grid with one apply rule per move kind
//! - `history` - Ordered move tokens replayed to the engine
//! - `position` - Board and history mutated together
//! - `legality` - Legal move sets and the perft-scraping oracle
//! - `turn_state` - Phases of a round
//! - `turn` - [`TurnController`], which drives the game

pub mod board_state;
pub mod error;
pub mod history;
pub mod legality;
pub mod moves;
pub mod position;
pub mod turn;
pub mod turn_state;
pub mod types;

pub use board_state::Board;
pub use error::{GameError, GameResult};
pub use history::MoveHistory;
pub use legality::{LegalMoveSet, LegalityOracle, PerftScrapeOracle};
pub use moves::{MoveKind, MoveToken};
pub use position::GamePosition;
pub use turn::{GameOutcome, TurnController, TurnEvent};
pub use turn_state::TurnState;
