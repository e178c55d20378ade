//! Engine → host byte channel
//!
//! The engine's stdout is drained by a dedicated reader thread that forwards
//! raw chunks over a `crossbeam-channel`. The control thread then waits on the
//! channel with a timeout, which gives three distinct outcomes instead of a
//! blocking `read` that cannot tell "nothing yet" from "gone":
//!
//! - [`ReadOutcome::Data`]: bytes arrived
//! - [`ReadOutcome::WouldBlock`]: nothing within the wait, stream still open
//! - [`ReadOutcome::Closed`]: the writer side is gone (EOF or read error)
//!
//! The reader thread never touches game state; it only moves bytes.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::io::{ErrorKind, Read};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

const CHUNK_SIZE: usize = 4096;

/// Result of one wait on the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Data(Vec<u8>),
    WouldBlock,
    Closed,
}

/// Receiving end of the engine → host stream
#[derive(Debug)]
pub struct ByteReceiver {
    rx: Receiver<Vec<u8>>,
    closed: bool,
}

impl ByteReceiver {
    /// Start a reader thread that pumps `source` into a new channel
    pub fn spawn_reader<R>(mut source: R, label: &str) -> std::io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, receiver) = byte_channel();
        let thread_label = label.to_string();

        thread::Builder::new()
            .name(format!("{label}-stdout"))
            .spawn(move || {
                let mut buffer = [0u8; CHUNK_SIZE];
                loop {
                    match source.read(&mut buffer) {
                        Ok(0) => {
                            debug!("[ENGINE] {} stdout reached EOF", thread_label);
                            break;
                        }
                        Ok(n) => {
                            trace!("[ENGINE] {} read {} bytes", thread_label, n);
                            if tx.send(buffer[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!("[ENGINE] {} stdout read failed: {}", thread_label, e);
                            break;
                        }
                    }
                }
            })?;

        Ok(receiver)
    }

    /// Wrap an existing channel; dropping every sender closes the stream
    pub fn from_channel(rx: Receiver<Vec<u8>>) -> Self {
        Self { rx, closed: false }
    }

    /// Wait up to `wait` for the next chunk
    pub fn recv(&mut self, wait: Duration) -> ReadOutcome {
        if self.closed {
            return ReadOutcome::Closed;
        }
        match self.rx.recv_timeout(wait) {
            Ok(chunk) => ReadOutcome::Data(chunk),
            Err(RecvTimeoutError::Timeout) => ReadOutcome::WouldBlock,
            Err(RecvTimeoutError::Disconnected) => {
                self.closed = true;
                ReadOutcome::Closed
            }
        }
    }

    /// Whether a `Closed` outcome has been observed
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Create a connected sender / [`ByteReceiver`] pair
pub fn byte_channel() -> (Sender<Vec<u8>>, ByteReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (tx, ByteReceiver::from_channel(rx))
}
