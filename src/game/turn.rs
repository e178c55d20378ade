//! Turn controller
//!
//! Owns the engine session, the game position and the turn state machine.
//! One round is: legality query, user move, engine search, engine move. The
//! board and history are only mutated here, through [`GamePosition::play`],
//! after a move has been checked against a fresh [`LegalMoveSet`].
//!
//! # Flow
//!
//! ```text
//! AwaitingHandshake → AwaitingUserMove → UserMoveApplied
//!        → AwaitingEngineMove → EngineMoveApplied → AwaitingUserMove …
//! ```
//!
//! `quit`, exhausted input or a position without moves ends the game in
//! `Terminated`. Engine failures are returned to the caller after the session
//! has been torn down.

use crate::core::settings::EngineSettings;
use crate::engine::protocol::BestMove;
use crate::engine::EngineSession;
use crate::game::board_state::Board;
use crate::game::error::{GameError, GameResult};
use crate::game::history::MoveHistory;
use crate::game::legality::{LegalMoveSet, LegalityOracle, PerftScrapeOracle};
use crate::game::moves::{MoveKind, MoveToken};
use crate::game::position::GamePosition;
use crate::game::turn_state::TurnState;
use crate::game::types::PieceColor;
use crate::ui::{BoardRenderer, MoveSource};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Console word that ends the game
pub const QUIT_COMMAND: &str = "quit";

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// User typed `quit`
    Quit,
    /// Move source ran dry
    InputClosed,
    /// The user's side has no legal move (mate or stalemate)
    NoLegalMoves { side: PieceColor },
    /// Engine answered `bestmove (none)`
    EngineHasNoMove,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Quit => write!(f, "Game ended by user"),
            GameOutcome::InputClosed => write!(f, "Input closed, game ended"),
            GameOutcome::NoLegalMoves { side } => write!(f, "{:?} has no legal moves", side),
            GameOutcome::EngineHasNoMove => write!(f, "Engine has no move"),
        }
    }
}

/// Result of one controller step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// Move applied to board and history
    Accepted(MoveToken, MoveKind),
    /// Game is over
    Terminated(GameOutcome),
}

/// Drives one game against one engine
pub struct TurnController<O: LegalityOracle = PerftScrapeOracle> {
    session: EngineSession,
    oracle: O,
    position: GamePosition,
    /// Legal moves of the current position; cleared by every ply
    legal: Option<LegalMoveSet>,
    state: TurnState,
    search_depth: u32,
    outcome: Option<GameOutcome>,
}

impl TurnController<PerftScrapeOracle> {
    /// Spawn the configured engine and complete the handshake
    pub fn start(settings: &EngineSettings) -> GameResult<Self> {
        let session = EngineSession::spawn(settings)?;
        let mut controller = Self::new(session, PerftScrapeOracle, settings.search_depth);
        controller.handshake(&settings.options)?;
        Ok(controller)
    }
}

impl<O: LegalityOracle> TurnController<O> {
    /// Controller for a session that has not been handshaken yet
    pub fn new(session: EngineSession, oracle: O, search_depth: u32) -> Self {
        Self {
            session,
            oracle,
            position: GamePosition::new(),
            legal: None,
            state: TurnState::AwaitingHandshake,
            search_depth,
            outcome: None,
        }
    }

    pub fn handshake(&mut self, options: &BTreeMap<String, String>) -> GameResult<()> {
        self.ensure_can(TurnState::AwaitingUserMove)?;
        if let Err(e) = self.session.handshake(options) {
            self.abort();
            return Err(e.into());
        }
        self.transition(TurnState::AwaitingUserMove)
    }

    /// Legal moves for the side to move, queried once per position
    pub fn legal_moves(&mut self) -> GameResult<&LegalMoveSet> {
        let moves = match self.legal.take() {
            Some(moves) => moves,
            None => self
                .oracle
                .legal_moves(&mut self.session, self.position.history())?,
        };
        let moves: &LegalMoveSet = self.legal.insert(moves);
        Ok(moves)
    }

    /// Validate and apply a token typed by the user
    ///
    /// `quit` shuts the engine down and terminates. A bare `<from><to>` that
    /// only exists as promotions promotes to a queen. Any token missing from
    /// the legal move set is rejected with the board and history untouched.
    pub fn submit_user_move(&mut self, input: &str) -> GameResult<TurnEvent> {
        self.ensure_can(TurnState::UserMoveApplied)?;

        let input = input.trim();
        if input == QUIT_COMMAND {
            self.finish(GameOutcome::Quit)?;
            return Ok(TurnEvent::Terminated(GameOutcome::Quit));
        }

        let token = match self.legal_moves()?.resolve(input) {
            Some(token) => token.clone(),
            None => {
                debug!("[TURN] Rejected user move '{}'", input);
                return Err(GameError::IllegalMoveRejected {
                    token: input.to_string(),
                });
            }
        };

        let kind = self.apply(token.clone())?;
        info!("[TURN] User played {} ({:?})", token, kind);
        self.transition(TurnState::UserMoveApplied)?;
        self.transition(TurnState::AwaitingEngineMove)?;
        Ok(TurnEvent::Accepted(token, kind))
    }

    /// Ask the engine for its reply and apply it
    pub fn play_engine_move(&mut self) -> GameResult<TurnEvent> {
        self.ensure_can(TurnState::EngineMoveApplied)?;

        let reply = self
            .session
            .best_move(self.position.history(), self.search_depth)?;
        let best = match reply {
            BestMove::Move { best, ponder } => {
                if let Some(ponder) = ponder {
                    debug!("[TURN] Engine ponders {}", ponder);
                }
                best
            }
            BestMove::NoMove => {
                self.finish(GameOutcome::EngineHasNoMove)?;
                return Ok(TurnEvent::Terminated(GameOutcome::EngineHasNoMove));
            }
        };

        let best = match self.legal_moves()?.resolve(best.as_str()) {
            Some(legal) => legal.clone(),
            None => {
                return Err(GameError::EngineMoveNotLegal {
                    token: best.to_string(),
                })
            }
        };

        let kind = self.apply(best.clone())?;
        info!("[TURN] Engine played {} ({:?})", best, kind);
        self.transition(TurnState::EngineMoveApplied)?;
        self.transition(TurnState::AwaitingUserMove)?;
        Ok(TurnEvent::Accepted(best, kind))
    }

    /// Play until the game ends or a fatal error occurs
    ///
    /// The board is rendered once up front and after every applied move.
    /// Rejected user moves are explained with one line and re-prompted.
    pub fn run(
        &mut self,
        input: &mut dyn MoveSource,
        renderer: &mut dyn BoardRenderer,
    ) -> GameResult<GameOutcome> {
        let result = self.drive(input, renderer);
        match &result {
            Ok(outcome) => input.announce(&outcome.to_string()),
            Err(e) => {
                error!("[TURN] Game aborted: {}", e);
                self.abort();
            }
        }
        result
    }

    fn drive(
        &mut self,
        input: &mut dyn MoveSource,
        renderer: &mut dyn BoardRenderer,
    ) -> GameResult<GameOutcome> {
        renderer.render(self.current_board());

        loop {
            if let Some(outcome) = self.outcome {
                return Ok(outcome);
            }

            match self.state {
                TurnState::AwaitingUserMove => {
                    if self.legal_moves()?.is_empty() {
                        let side = self.position.side_to_move();
                        self.finish(GameOutcome::NoLegalMoves { side })?;
                        continue;
                    }

                    let Some(line) = input.next_move()? else {
                        self.finish(GameOutcome::InputClosed)?;
                        continue;
                    };

                    match self.submit_user_move(&line) {
                        Ok(TurnEvent::Accepted(..)) => renderer.render(self.current_board()),
                        Ok(TurnEvent::Terminated(_)) => {}
                        Err(e) if e.is_recoverable() => input.reject(&e.to_string()),
                        Err(e) => return Err(e),
                    }
                }
                TurnState::AwaitingEngineMove => {
                    if let TurnEvent::Accepted(token, _) = self.play_engine_move()? {
                        renderer.render(self.current_board());
                        input.announce(&format!("Engine played {}", token));
                        input.announce(&format!("Moves: {}", self.history().to_uci_list()));
                    }
                }
                other => {
                    return Err(GameError::InvalidStateTransition {
                        from: other,
                        to: TurnState::AwaitingUserMove,
                    })
                }
            }
        }
    }

    fn apply(&mut self, token: MoveToken) -> GameResult<MoveKind> {
        let kind = self.position.play(token)?;
        self.legal = None;
        Ok(kind)
    }

    /// Shut the engine down and record the outcome
    fn finish(&mut self, outcome: GameOutcome) -> GameResult<()> {
        self.ensure_can(TurnState::Terminated)?;
        self.session.shutdown()?;
        self.transition(TurnState::Terminated)?;
        info!("[TURN] {}", outcome);
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Forced termination after a fatal error
    fn abort(&mut self) {
        if let Err(e) = self.session.shutdown() {
            warn!("[TURN] Engine shutdown failed: {}", e);
        }
        if !self.state.is_terminal() {
            warn!("[TURN] Forcing {} -> {}", self.state, TurnState::Terminated);
            self.state = TurnState::Terminated;
        }
        self.legal = None;
    }

    fn ensure_can(&self, next: TurnState) -> GameResult<()> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(GameError::InvalidStateTransition {
                from: self.state,
                to: next,
            })
        }
    }

    fn transition(&mut self, next: TurnState) -> GameResult<()> {
        self.ensure_can(next)?;
        debug!("[TURN] {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Board after the last applied move
    pub fn current_board(&self) -> &Board {
        self.position.current_board()
    }

    pub fn history(&self) -> &MoveHistory {
        self.position.history()
    }

    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn session(&self) -> &EngineSession {
        &self.session
    }
}
