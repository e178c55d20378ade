//! Protocol transcript reader
//!
//! Engine replies arrive in arbitrary chunks. [`TranscriptReader::read_until`]
//! accumulates them until a sentinel substring shows up, then returns the
//! accumulated text.
//!
//! A reply counts as complete once the line containing the sentinel has been
//! terminated by `\n`, so `bestmove e2e4` is never handed out as `bestmove e2`
//! when the token is split across chunks. Bytes that follow that line stay
//! buffered for the next call.

use crate::engine::channel::{ByteReceiver, ReadOutcome};
use crate::engine::error::{EngineError, EngineResult};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Accumulates engine output across reads
#[derive(Debug)]
pub struct TranscriptReader {
    source: ByteReceiver,
    pending: Vec<u8>,
}

impl TranscriptReader {
    pub fn new(source: ByteReceiver) -> Self {
        Self {
            source,
            pending: Vec::new(),
        }
    }

    /// Read until `sentinel` has appeared on a completed line
    ///
    /// Returns everything accumulated up to and including that line. Fails
    /// with `EngineDisconnected` if the stream closes first and with
    /// `EngineTimeout` if `timeout` elapses first.
    pub fn read_until(&mut self, sentinel: &str, timeout: Duration) -> EngineResult<String> {
        let deadline = Instant::now() + timeout;
        let needle = sentinel.as_bytes();

        loop {
            if let Some(end) = complete_reply_end(&self.pending, needle) {
                let reply: Vec<u8> = self.pending.drain(..end).collect();
                let text = String::from_utf8_lossy(&reply).into_owned();
                for line in text.lines() {
                    debug!("[UCI] << {}", line);
                }
                return Ok(text);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(EngineError::EngineTimeout {
                    sentinel: sentinel.to_string(),
                    timeout,
                });
            }

            match self.source.recv(remaining) {
                ReadOutcome::Data(chunk) => {
                    trace!("[UCI] chunk of {} bytes", chunk.len());
                    self.pending.extend_from_slice(&chunk);
                }
                ReadOutcome::WouldBlock => continue,
                ReadOutcome::Closed => {
                    return Err(EngineError::disconnected(format!(
                        "waiting for '{sentinel}'"
                    )));
                }
            }
        }
    }

    /// Bytes received but not yet returned by `read_until`
    pub fn buffered(&self) -> &[u8] {
        &self.pending
    }

    /// Discard any buffered output
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// End offset of the first line containing `needle`, if that line is complete
fn complete_reply_end(buffer: &[u8], needle: &[u8]) -> Option<usize> {
    let start = find(buffer, needle)?;
    let after = start + needle.len();
    buffer[after..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|offset| after + offset + 1)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
