//! Engine Process Integration Tests
//!
//! Sessions backed by real child processes. Standard Unix tools stand in for
//! an engine:
//! - `cat` echoes every command back
//! - `true` exits immediately
//! - a missing path never starts

#![cfg(unix)]

use chess_uci_host::core::EngineSettings;
use chess_uci_host::engine::{EngineError, EngineSession};
use chess_uci_host::game::{GameError, TurnController};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn settings(engine: &str) -> EngineSettings {
    EngineSettings {
        engine_path: PathBuf::from(engine),
        read_timeout_ms: 2_000,
        shutdown_grace_ms: 200,
        ..Default::default()
    }
}

#[test]
fn test_missing_engine_is_spawn_error() {
    let err = EngineSession::spawn(&settings("./no/such/engine")).unwrap_err();
    assert!(matches!(err, EngineError::SpawnError { .. }));
}

#[test]
fn test_missing_engine_fails_controller_start() {
    let err = TurnController::start(&settings("./no/such/engine")).err().unwrap();
    assert!(matches!(err, GameError::Engine(EngineError::SpawnError { .. })));
}

#[test]
fn test_echo_engine_round_trip() {
    let mut session = EngineSession::spawn(&settings("cat")).unwrap();
    assert!(session.is_alive());

    session.send("uciok").unwrap();
    let reply = session.read_until("uciok").unwrap();
    assert_eq!(reply, "uciok\n");

    session.send("info string hello").unwrap();
    session.send("readyok").unwrap();
    let reply = session.read_until("readyok").unwrap();
    assert_eq!(reply, "info string hello\nreadyok\n");

    session.shutdown().unwrap();
    assert!(!session.is_alive());
}

#[test]
fn test_echo_engine_without_sentinel_times_out() {
    let mut cfg = settings("cat");
    cfg.read_timeout_ms = 150;
    let mut session = EngineSession::spawn(&cfg).unwrap();

    let started = Instant::now();
    let err = session.handshake(&Default::default()).unwrap_err();
    assert!(matches!(err, EngineError::EngineTimeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_exited_engine_is_disconnect() {
    let mut session = EngineSession::spawn(&settings("true")).unwrap();

    let err = session.handshake(&Default::default()).unwrap_err();
    assert!(
        matches!(err, EngineError::EngineDisconnected { .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn test_shutdown_is_idempotent() {
    let mut session = EngineSession::spawn(&settings("cat")).unwrap();
    session.shutdown().unwrap();
    session.shutdown().unwrap();
    drop(session);
}
