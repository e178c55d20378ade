//! Engine session
//!
//! [`EngineSession`] ties together the command sender, the transcript reader
//! and (for real engines) the child process. It speaks the handful of UCI
//! exchanges the game needs: handshake, position setup, one-ply enumeration
//! and depth-bounded search.
//!
//! # Lifetime
//!
//! A session exists from a successful handshake until [`EngineSession::shutdown`]
//! or drop. Exactly one request is ever in flight: every command that expects
//! a reply is followed by a blocking `read_until` with a deadline.

use crate::core::settings::EngineSettings;
use crate::engine::channel::ByteReceiver;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::process::EngineProcess;
use crate::engine::protocol::{
    self, BestMove, CMD_IS_READY, CMD_NEW_GAME, CMD_QUIT, CMD_UCI, SENTINEL_BEST_MOVE,
    SENTINEL_READY_OK, SENTINEL_UCI_OK,
};
use crate::engine::sender::CommandSender;
use crate::engine::transcript::TranscriptReader;
use crate::game::history::MoveHistory;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default grace period for in-memory transports
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Connection to one engine instance
#[derive(Debug)]
pub struct EngineSession {
    sender: CommandSender,
    reader: TranscriptReader,
    process: Option<EngineProcess>,
    read_timeout: Duration,
    shutdown_grace: Duration,
    engine_name: Option<String>,
    shut_down: bool,
}

impl EngineSession {
    /// Spawn the configured engine without talking to it yet
    pub fn spawn(settings: &EngineSettings) -> EngineResult<Self> {
        let (process, pipes) = EngineProcess::spawn(&settings.engine_path, &settings.engine_args)?;
        let label = settings
            .engine_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("engine")
            .to_string();
        let source = ByteReceiver::spawn_reader(pipes.stdout, &label)?;

        let mut session = Self::from_transport(Box::new(pipes.stdin), source, settings.read_timeout());
        session.process = Some(process);
        session.shutdown_grace = settings.shutdown_grace();
        Ok(session)
    }

    /// Wrap an already-connected transport; no handshake is performed
    pub fn from_transport(
        sink: Box<dyn Write + Send>,
        source: ByteReceiver,
        read_timeout: Duration,
    ) -> Self {
        Self {
            sender: CommandSender::new(sink),
            reader: TranscriptReader::new(source),
            process: None,
            read_timeout,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            engine_name: None,
            shut_down: false,
        }
    }

    /// `uci` → `uciok`, options, `ucinewgame`, `isready` → `readyok`
    pub fn handshake(&mut self, options: &BTreeMap<String, String>) -> EngineResult<()> {
        self.send(CMD_UCI)?;
        let identification = self.read_until(SENTINEL_UCI_OK)?;
        self.engine_name = protocol::parse_engine_name(&identification);

        for (name, value) in options {
            self.send(&protocol::set_option_command(name, value))?;
        }
        self.send(CMD_NEW_GAME)?;
        self.sync_ready()?;

        info!(
            "[ENGINE] Engine ready: {}",
            self.engine_name.as_deref().unwrap_or("unnamed engine")
        );
        Ok(())
    }

    /// `isready` → `readyok`
    pub fn sync_ready(&mut self) -> EngineResult<()> {
        self.send(CMD_IS_READY)?;
        self.read_until(SENTINEL_READY_OK).map(|_| ())
    }

    pub fn send(&mut self, command: &str) -> EngineResult<()> {
        self.sender.send(command)
    }

    /// Read until `sentinel` using the session's read deadline
    pub fn read_until(&mut self, sentinel: &str) -> EngineResult<String> {
        self.reader.read_until(sentinel, self.read_timeout)
    }

    /// Replay the full move history to the engine
    pub fn set_position(&mut self, history: &MoveHistory) -> EngineResult<()> {
        self.send(&protocol::position_command(history))
    }

    /// Search the position reached by `history` to `depth` plies
    ///
    /// A transcript that ends in `bestmove` without a usable move is a
    /// `ProtocolParseFailure`, never an empty move.
    pub fn best_move(&mut self, history: &MoveHistory, depth: u32) -> EngineResult<BestMove> {
        self.set_position(history)?;
        self.send(&protocol::go_depth_command(depth))?;
        let transcript = self.read_until(SENTINEL_BEST_MOVE)?;

        let reply = protocol::parse_best_move(&transcript)
            .ok_or_else(|| EngineError::parse_failure("bestmove <move>", &transcript))?;
        debug!("[ENGINE] Search at depth {} answered {:?}", depth, reply);
        Ok(reply)
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    /// Whether the session can still talk to its engine
    pub fn is_alive(&mut self) -> bool {
        if self.shut_down || self.sender.is_closed() {
            return false;
        }
        match self.process.as_mut() {
            Some(process) => process.is_running(),
            None => true,
        }
    }

    /// Send `quit`, close both streams and reap the process
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn shutdown(&mut self) -> EngineResult<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;

        if let Err(e) = self.sender.send(CMD_QUIT) {
            debug!("[ENGINE] quit not delivered: {}", e);
        }
        self.sender.close();
        self.reader.clear();

        if let Some(process) = self.process.as_mut() {
            process.shutdown(self.shutdown_grace)?;
        }
        info!("[ENGINE] Session closed");
        Ok(())
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("[ENGINE] Shutdown during drop failed: {}", e);
        }
    }
}
