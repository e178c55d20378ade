//! Legal move resolution
//!
//! The host knows no chess rules. Legality comes from the engine through a
//! [`LegalityOracle`]; the Turn Controller only ever asks the trait, so the
//! source of truth can be swapped without touching the game loop.
//!
//! # Perft scraping
//!
//! [`PerftScrapeOracle`] sends `go perft 1` and scrapes the per-move listing:
//!
//! ```text
//! a2a3: 1
//! b2b3: 1
//! ...
//! Nodes searched: 20
//! ```
//!
//! This is a heuristic over a diagnostic listing, not a structured API. A
//! whitespace token is a candidate when it has at least 4 characters and its
//! third character is a file letter `a..=h`; candidates that do not then
//! parse as a move token are dropped. Engine chatter that happens to have the
//! same shape would still be admitted, which is why the oracle is a trait.
//! The resulting set is keyed by the deduplicated 4-character prefixes.

use crate::engine::error::EngineResult;
use crate::engine::protocol::{CMD_PERFT_ONE_PLY, SENTINEL_PERFT_DONE};
use crate::engine::session::EngineSession;
use crate::game::history::MoveHistory;
use crate::game::moves::MoveToken;
use crate::game::types::PieceType;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Set of moves legal in exactly one position
///
/// Membership is by the 4-character `<from><to>` prefix, so the four
/// promotions of one pawn are a single legal move. The full tokens are kept
/// so a promotion is applied with its piece.
///
/// Never reused after the board changes; ask the oracle again instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoveSet {
    moves: BTreeSet<MoveToken>,
}

impl LegalMoveSet {
    /// Whether `token` names a legal move (see [`LegalMoveSet::resolve`])
    pub fn contains(&self, token: &str) -> bool {
        self.resolve(token).is_some()
    }

    /// Legal move that a typed token stands for
    ///
    /// A 5-character token must match exactly. A 4-character token matches
    /// by prefix; when the prefix only exists as promotions the queen is
    /// chosen.
    pub fn resolve(&self, token: &str) -> Option<&MoveToken> {
        if let Some(exact) = self.moves.iter().find(|m| m.as_str() == token) {
            return Some(exact);
        }
        if token.len() != 4 {
            return None;
        }

        let mut matching = self
            .moves
            .iter()
            .filter(|m| m.as_str().get(..4) == Some(token));
        let queen = matching
            .clone()
            .find(|m| m.promotion() == Some(PieceType::Queen));
        queen.or_else(|| matching.next())
    }

    /// Number of distinct `<from><to>` moves
    pub fn len(&self) -> usize {
        self.prefixes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveToken> {
        self.moves.iter()
    }

    /// Distinct `<from><to>` prefixes; promotions collapse to one entry
    pub fn prefixes(&self) -> BTreeSet<String> {
        self.moves.iter().map(|m| m.as_str()[..4].to_string()).collect()
    }
}

impl FromIterator<MoveToken> for LegalMoveSet {
    fn from_iter<I: IntoIterator<Item = MoveToken>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

/// Source of legal moves for a position given as a move history
pub trait LegalityOracle {
    fn legal_moves(
        &self,
        session: &mut EngineSession,
        history: &MoveHistory,
    ) -> EngineResult<LegalMoveSet>;
}

/// Oracle backed by the engine's `go perft 1` listing
#[derive(Debug, Clone, Copy, Default)]
pub struct PerftScrapeOracle;

impl LegalityOracle for PerftScrapeOracle {
    fn legal_moves(
        &self,
        session: &mut EngineSession,
        history: &MoveHistory,
    ) -> EngineResult<LegalMoveSet> {
        session.set_position(history)?;
        session.send(CMD_PERFT_ONE_PLY)?;
        let transcript = session.read_until(SENTINEL_PERFT_DONE)?;

        let moves = scrape_perft_listing(&transcript);
        debug!(
            "[LEGALITY] {} legal moves after {} plies",
            moves.len(),
            history.len()
        );
        Ok(moves)
    }
}

/// Extract candidate moves from a perft transcript
pub fn scrape_perft_listing(transcript: &str) -> LegalMoveSet {
    transcript
        .split_whitespace()
        .filter(|token| looks_like_move(token))
        .filter_map(|token| {
            let candidate = move_text(token);
            match MoveToken::parse(candidate) {
                Ok(mv) => Some(mv),
                Err(_) => {
                    trace!("[LEGALITY] Ignoring move-shaped token {:?}", token);
                    None
                }
            }
        })
        .collect()
}

/// Shape test: length ≥ 4 and third character is a file letter
fn looks_like_move(token: &str) -> bool {
    token.len() >= 4 && matches!(token.as_bytes()[2], b'a'..=b'h')
}

/// Leading move text of a listing entry such as `e7e8q:`
fn move_text(token: &str) -> &str {
    let trimmed = token.trim_end_matches(':');
    let has_promotion = trimmed.len() == 5
        && matches!(trimmed.as_bytes()[4], b'q' | b'r' | b'b' | b'n');
    if has_promotion {
        trimmed
    } else {
        trimmed.get(..4).unwrap_or(trimmed)
    }
}
