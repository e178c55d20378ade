//! In-memory UCI engine for integration tests
//!
//! [`ScriptedEngine`] stands in for the engine's stdin: every complete
//! command line written to it is logged and answered through a byte channel,
//! which the session reads exactly as it would read a child's stdout.

#![allow(dead_code)]

use chess_uci_host::engine::{byte_channel, EngineSession};
use crossbeam_channel::Sender;
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// The twenty legal moves of the start position
pub const START_MOVES: &[&str] = &[
    "a2a3", "b2b3", "c2c3", "d2d3", "e2e3", "f2f3", "g2g3", "h2h3", "a2a4", "b2b4", "c2c4",
    "d2d4", "e2e4", "f2f4", "g2g4", "h2h4", "b1a3", "b1c3", "g1f3", "g1h3",
];

/// Black's legal moves after 1. e4
pub const AFTER_E4_MOVES: &[&str] = &[
    "a7a6", "b7b6", "c7c6", "d7d6", "e7e6", "f7f6", "g7g6", "h7h6", "a7a5", "b7b5", "c7c5",
    "d7d5", "e7e5", "f7f5", "g7g5", "h7h5", "b8a6", "b8c6", "g8f6", "g8h6",
];

/// Commands received by a scripted engine, in order
#[derive(Clone, Default)]
pub struct CommandLog(Arc<Mutex<Vec<String>>>);

impl CommandLog {
    pub fn commands(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands().iter().any(|c| c == command)
    }

    pub fn count(&self, command: &str) -> usize {
        self.commands().iter().filter(|c| c.as_str() == command).count()
    }

    pub fn last(&self) -> Option<String> {
        self.commands().last().cloned()
    }

    fn push(&self, command: String) {
        self.0.lock().unwrap().push(command);
    }
}

/// Replies a [`ScriptedEngine`] will give
#[derive(Default)]
pub struct EngineScript {
    perft: BTreeMap<String, Vec<String>>,
    default_perft: Vec<String>,
    best_moves: VecDeque<String>,
    silent_on: Option<String>,
    hang_up_on: Option<String>,
    name: Option<String>,
}

impl EngineScript {
    /// Start position and 1. e4 listings preloaded; any other position
    /// answers with `default_perft`
    pub fn new() -> Self {
        Self::default()
            .perft("", START_MOVES)
            .perft("e2e4", AFTER_E4_MOVES)
            .named("Scripted Fish")
    }

    /// Perft listing for the position reached by `moves` (space separated)
    pub fn perft(mut self, moves: &str, listing: &[&str]) -> Self {
        self.perft.insert(
            moves.to_string(),
            listing.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn default_perft(mut self, listing: &[&str]) -> Self {
        self.default_perft = listing.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Queue the move part of a `bestmove` line, e.g. `e7e5 ponder g1f3`
    pub fn best_move(mut self, reply: &str) -> Self {
        self.best_moves.push_back(reply.to_string());
        self
    }

    /// Never answer commands starting with `prefix`
    pub fn silent_on(mut self, prefix: &str) -> Self {
        self.silent_on = Some(prefix.to_string());
        self
    }

    /// Close stdout when a command starting with `prefix` arrives
    pub fn hang_up_on(mut self, prefix: &str) -> Self {
        self.hang_up_on = Some(prefix.to_string());
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Session wired to a scripted engine; no handshake yet
    pub fn connect(self, read_timeout: Duration) -> (EngineSession, CommandLog) {
        let (tx, rx) = byte_channel();
        let log = CommandLog::default();
        let engine = ScriptedEngine {
            replies: Some(tx),
            line: Vec::new(),
            log: log.clone(),
            script: self,
            moves: String::new(),
        };
        let session = EngineSession::from_transport(Box::new(engine), rx, read_timeout);
        (session, log)
    }

    /// Connected session with the handshake already done
    pub fn ready(self) -> (EngineSession, CommandLog) {
        let (mut session, log) = self.connect(DEFAULT_TIMEOUT);
        session.handshake(&BTreeMap::new()).unwrap();
        (session, log)
    }
}

/// Fake engine stdin
pub struct ScriptedEngine {
    replies: Option<Sender<Vec<u8>>>,
    line: Vec<u8>,
    log: CommandLog,
    script: EngineScript,
    moves: String,
}

impl ScriptedEngine {
    fn handle(&mut self, command: String) {
        self.log.push(command.clone());

        if let Some(prefix) = &self.script.hang_up_on {
            if command.starts_with(prefix.as_str()) {
                self.replies = None;
                return;
            }
        }
        if let Some(prefix) = &self.script.silent_on {
            if command.starts_with(prefix.as_str()) {
                return;
            }
        }

        if command == "uci" {
            let name = self.script.name.clone().unwrap_or_default();
            self.reply(&format!("id name {name}\nid author tests\noption name Hash type spin default 16 min 1 max 1024\nuciok\n"));
        } else if command == "isready" {
            self.reply("readyok\n");
        } else if let Some(rest) = command.strip_prefix("position startpos") {
            self.moves = rest
                .trim()
                .strip_prefix("moves")
                .unwrap_or("")
                .trim()
                .to_string();
        } else if command == "go perft 1" {
            let listing = self
                .script
                .perft
                .get(&self.moves)
                .unwrap_or(&self.script.default_perft)
                .clone();
            let mut text: String = listing.iter().map(|m| format!("{m}: 1\n")).collect();
            text.push_str(&format!("\nNodes searched: {}\n\n", listing.len()));
            // two chunks, split mid-transcript
            let (head, tail) = text.split_at(text.len() / 2);
            self.reply(head);
            self.reply(tail);
        } else if command.starts_with("go depth") {
            let best = self
                .script
                .best_moves
                .pop_front()
                .unwrap_or_else(|| "(none)".to_string());
            self.reply(&format!(
                "info depth 1 seldepth 1 score cp 20 nodes 20\nbestmove {best}\n"
            ));
        } else if command == "quit" {
            self.replies = None;
        }
    }

    fn reply(&self, text: &str) {
        if let Some(tx) = &self.replies {
            let _ = tx.send(text.as_bytes().to_vec());
        }
    }
}

impl Write for ScriptedEngine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == b'\n' {
                let command = String::from_utf8_lossy(&self.line).trim().to_string();
                self.line.clear();
                self.handle(command);
            } else {
                self.line.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
