//! Turn Flow Integration Tests
//!
//! Tests for whole rounds driven by the turn controller:
//! - User move validation against the engine's legal moves
//! - Engine replies applied to board and history
//! - Game endings (quit, closed input, no moves)
//! - Fatal engine failures

mod common;

use chess_uci_host::engine::EngineError;
use chess_uci_host::game::{
    Board, GameError, GameOutcome, GamePosition, MoveKind, MoveToken, PerftScrapeOracle,
    TurnController, TurnEvent, TurnState,
};
use chess_uci_host::game::types::{Piece, PieceColor, PieceType, Square};
use chess_uci_host::ui::{BoardRenderer, MoveSource};
use common::{CommandLog, EngineScript, DEFAULT_TIMEOUT};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR";

/// Controller with the handshake done
fn controller(script: EngineScript) -> (TurnController, CommandLog) {
    let (session, log) = script.connect(DEFAULT_TIMEOUT);
    let mut controller = TurnController::new(session, PerftScrapeOracle, 5);
    controller.handshake(&BTreeMap::new()).unwrap();
    (controller, log)
}

fn mv(s: &str) -> MoveToken {
    MoveToken::parse(s).unwrap()
}

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

/// Move source fed from a fixed list of lines
#[derive(Default)]
struct ScriptedInput {
    lines: VecDeque<String>,
    rejections: Vec<String>,
    announcements: Vec<String>,
}

impl ScriptedInput {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }
}

impl MoveSource for ScriptedInput {
    fn next_move(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn reject(&mut self, reason: &str) {
        self.rejections.push(reason.to_string());
    }

    fn announce(&mut self, message: &str) {
        self.announcements.push(message.to_string());
    }
}

/// Renderer that keeps every board it was shown
#[derive(Default)]
struct RecordingRenderer {
    boards: Vec<String>,
}

impl BoardRenderer for RecordingRenderer {
    fn render(&mut self, board: &Board) {
        self.boards.push(board.placement());
    }
}

// ============================================================================
// Single Step Tests
// ============================================================================

#[test]
fn test_user_move_then_engine_reply() {
    let (mut game, log) = controller(EngineScript::new().best_move("e7e5 ponder g1f3"));
    assert_eq!(game.state(), TurnState::AwaitingUserMove);

    let event = game.submit_user_move("e2e4").unwrap();
    assert_eq!(event, TurnEvent::Accepted(mv("e2e4"), MoveKind::Simple));
    assert_eq!(game.state(), TurnState::AwaitingEngineMove);
    assert_eq!(
        game.current_board().get(sq("e4")),
        Some(Piece::new(PieceColor::White, PieceType::Pawn))
    );
    assert_eq!(game.current_board().get(sq("e2")), None);

    let event = game.play_engine_move().unwrap();
    assert_eq!(event, TurnEvent::Accepted(mv("e7e5"), MoveKind::Simple));
    assert_eq!(game.state(), TurnState::AwaitingUserMove);
    assert_eq!(game.history().as_slice(), &[mv("e2e4"), mv("e7e5")]);
    assert_eq!(game.current_board().placement(), AFTER_E4_E5);
    assert!(log.contains("go depth 5"));
    assert!(log.contains("position startpos moves e2e4"));
}

#[test]
fn test_board_matches_replayed_history() {
    let (mut game, _log) = controller(EngineScript::new().best_move("e7e5"));
    game.submit_user_move("e2e4").unwrap();
    game.play_engine_move().unwrap();

    let replayed = GamePosition::replay(game.history()).unwrap();
    assert_eq!(replayed.current_board(), game.current_board());
}

#[test]
fn test_illegal_move_is_rejected() {
    let (mut game, _log) = controller(EngineScript::new());

    let err = game.submit_user_move("e2e5").unwrap_err();
    assert!(matches!(err, GameError::IllegalMoveRejected { ref token } if token == "e2e5"));
    assert!(err.is_recoverable());
    assert_eq!(game.state(), TurnState::AwaitingUserMove);
    assert!(game.history().is_empty());
    assert_eq!(game.current_board(), &Board::starting());
}

#[test]
fn test_garbage_input_is_rejected() {
    let (mut game, _log) = controller(EngineScript::new());

    for input in ["", "hello", "e2", "e2e4e5"] {
        let err = game.submit_user_move(input).unwrap_err();
        assert!(err.is_recoverable(), "{input:?} should be recoverable");
    }
    assert!(game.history().is_empty());
}

#[test]
fn test_legal_moves_queried_once_per_position() {
    let (mut game, log) = controller(EngineScript::new());
    game.submit_user_move("e2e5").unwrap_err();
    game.submit_user_move("e7e5").unwrap_err();
    game.submit_user_move("e2e4").unwrap();

    assert_eq!(log.count("go perft 1"), 1);
}

#[test]
fn test_quit_terminates_and_sends_quit() {
    let (mut game, log) = controller(EngineScript::new());

    let event = game.submit_user_move("quit").unwrap();
    assert_eq!(event, TurnEvent::Terminated(GameOutcome::Quit));
    assert_eq!(game.state(), TurnState::Terminated);
    assert_eq!(game.outcome(), Some(GameOutcome::Quit));
    assert_eq!(log.last().as_deref(), Some("quit"));

    let err = game.submit_user_move("e2e4").unwrap_err();
    assert!(matches!(err, GameError::InvalidStateTransition { .. }));
    assert!(game.history().is_empty());
    assert_eq!(log.count("quit"), 1);
}

#[test]
fn test_quit_is_case_sensitive() {
    let (mut game, log) = controller(EngineScript::new());

    let err = game.submit_user_move("QUIT").unwrap_err();
    assert!(matches!(err, GameError::IllegalMoveRejected { ref token } if token == "QUIT"));
    assert_eq!(game.state(), TurnState::AwaitingUserMove);
    assert!(!log.contains("quit"));
}

#[test]
fn test_bare_promotion_move_promotes_to_queen() {
    let listing = ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "e1e2"];
    let (mut game, _log) = controller(EngineScript::new().perft("", &listing));

    let event = game.submit_user_move("a7a8").unwrap();
    assert_eq!(
        event,
        TurnEvent::Accepted(mv("a7a8q"), MoveKind::Promotion(PieceType::Queen))
    );
    assert_eq!(game.history().to_uci_list(), "a7a8q");
    assert_eq!(
        game.current_board().get(sq("a8")).map(|piece| piece.piece_type),
        Some(PieceType::Queen)
    );
    assert_eq!(game.current_board().get(sq("a7")), None);
}

#[test]
fn test_explicit_underpromotion_is_kept() {
    let listing = ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "e1e2"];
    let (mut game, _log) = controller(EngineScript::new().perft("", &listing));

    let event = game.submit_user_move("a7a8n").unwrap();
    assert_eq!(
        event,
        TurnEvent::Accepted(mv("a7a8n"), MoveKind::Promotion(PieceType::Knight))
    );
    assert_eq!(
        game.current_board().get(sq("a8")).map(|piece| piece.piece_type),
        Some(PieceType::Knight)
    );
}

#[test]
fn test_engine_turn_out_of_order_is_refused() {
    let (mut game, _log) = controller(EngineScript::new());
    let err = game.play_engine_move().unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidStateTransition {
            from: TurnState::AwaitingUserMove,
            ..
        }
    ));
}

#[test]
fn test_engine_without_move_ends_game() {
    let (mut game, log) = controller(EngineScript::new().best_move("(none)"));
    game.submit_user_move("e2e4").unwrap();

    let event = game.play_engine_move().unwrap();
    assert_eq!(event, TurnEvent::Terminated(GameOutcome::EngineHasNoMove));
    assert_eq!(game.state(), TurnState::Terminated);
    assert_eq!(game.history().len(), 1);
    assert!(log.contains("quit"));
}

#[test]
fn test_engine_move_outside_legal_set_is_fatal() {
    let (mut game, _log) = controller(EngineScript::new().best_move("e2e4"));
    game.submit_user_move("e2e4").unwrap();

    let err = game.play_engine_move().unwrap_err();
    assert!(matches!(err, GameError::EngineMoveNotLegal { ref token } if token == "e2e4"));
    assert!(!err.is_recoverable());
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_games_are_independent() {
    let (mut first, _) = controller(EngineScript::new().best_move("e7e5"));
    let (second, _) = controller(EngineScript::new());

    first.submit_user_move("e2e4").unwrap();
    first.play_engine_move().unwrap();

    assert_eq!(first.history().len(), 2);
    assert!(second.history().is_empty());
    assert_eq!(second.current_board(), &Board::starting());
}

// ============================================================================
// Game Loop Tests
// ============================================================================

#[test]
fn test_run_plays_until_quit() {
    let (mut game, log) = controller(
        EngineScript::new()
            .best_move("e7e5")
            .default_perft(&["g1f3", "d2d4", "f1c4"]),
    );
    let mut input = ScriptedInput::new(&["e2e5", "e2e4", "quit"]);
    let mut renderer = RecordingRenderer::default();

    let outcome = game.run(&mut input, &mut renderer).unwrap();

    assert_eq!(outcome, GameOutcome::Quit);
    assert_eq!(game.history().to_uci_list(), "e2e4 e7e5");
    assert_eq!(input.rejections, vec!["Illegal move: e2e5"]);
    assert!(input.announcements.contains(&"Engine played e7e5".to_string()));
    assert!(input.announcements.contains(&"Moves: e2e4 e7e5".to_string()));
    assert_eq!(input.announcements.last().map(String::as_str), Some("Game ended by user"));

    // start, after the user move, after the engine move
    assert_eq!(renderer.boards.len(), 3);
    assert_eq!(renderer.boards[2], AFTER_E4_E5);
    assert_eq!(log.last().as_deref(), Some("quit"));
}

#[test]
fn test_run_ends_when_input_closes() {
    let (mut game, log) = controller(EngineScript::new());
    let mut input = ScriptedInput::new(&[]);
    let mut renderer = RecordingRenderer::default();

    let outcome = game.run(&mut input, &mut renderer).unwrap();
    assert_eq!(outcome, GameOutcome::InputClosed);
    assert_eq!(renderer.boards.len(), 1);
    assert!(log.contains("quit"));
}

#[test]
fn test_run_stops_without_legal_moves() {
    let (mut game, _log) = controller(EngineScript::new().perft("", &[]));
    let mut input = ScriptedInput::new(&["e2e4"]);
    let mut renderer = RecordingRenderer::default();

    let outcome = game.run(&mut input, &mut renderer).unwrap();
    assert_eq!(
        outcome,
        GameOutcome::NoLegalMoves {
            side: PieceColor::White
        }
    );
    assert_eq!(input.lines.len(), 1, "input must not be consumed");
}

#[test]
fn test_run_surfaces_engine_timeout() {
    let (session, log) = EngineScript::new()
        .silent_on("go depth")
        .connect(Duration::from_millis(100));
    let mut game = TurnController::new(session, PerftScrapeOracle, 5);
    game.handshake(&BTreeMap::new()).unwrap();

    let mut input = ScriptedInput::new(&["e2e4"]);
    let mut renderer = RecordingRenderer::default();
    let err = game.run(&mut input, &mut renderer).unwrap_err();

    assert!(matches!(
        err,
        GameError::Engine(EngineError::EngineTimeout { .. })
    ));
    assert!(!err.is_recoverable());
    assert_eq!(game.state(), TurnState::Terminated);
    assert_eq!(game.history().len(), 1);
    assert!(log.contains("quit"));
}

#[test]
fn test_handshake_failure_terminates() {
    let (session, log) = EngineScript::new()
        .hang_up_on("isready")
        .connect(DEFAULT_TIMEOUT);
    let mut game = TurnController::new(session, PerftScrapeOracle, 5);

    let err = game.handshake(&BTreeMap::new()).unwrap_err();
    assert!(matches!(
        err,
        GameError::Engine(EngineError::EngineDisconnected { .. })
    ));
    assert_eq!(game.state(), TurnState::Terminated);
    assert!(log.contains("quit"));
}
