//! Host → engine command sender

use crate::engine::error::{EngineError, EngineResult};
use std::io::{ErrorKind, Write};
use tracing::debug;

/// Writes newline-terminated commands to the engine's stdin
pub struct CommandSender {
    sink: Option<Box<dyn Write + Send>>,
}

impl CommandSender {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Write `command` followed by `\n` and flush
    ///
    /// `write_all` retries short writes until every byte is out. A closed
    /// pipe becomes `EngineDisconnected`.
    pub fn send(&mut self, command: &str) -> EngineResult<()> {
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| EngineError::disconnected(format!("sending '{command}'")))?;

        debug!("[UCI] >> {}", command);
        let mut line = Vec::with_capacity(command.len() + 1);
        line.extend_from_slice(command.as_bytes());
        line.push(b'\n');

        sink.write_all(&line)
            .and_then(|_| sink.flush())
            .map_err(|e| match e.kind() {
                ErrorKind::BrokenPipe
                | ErrorKind::ConnectionReset
                | ErrorKind::UnexpectedEof
                | ErrorKind::WriteZero => {
                    EngineError::disconnected(format!("sending '{command}'"))
                }
                _ => EngineError::Io(e),
            })
    }

    /// Close the stream; the engine sees EOF on stdin
    pub fn close(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            let _ = sink.flush();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender")
            .field("closed", &self.is_closed())
            .finish()
    }
}
