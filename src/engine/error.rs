//! Error types for the engine session
//!
//! Covers process startup, the byte streams to and from the child, and
//! parsing of the engine's replies.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while driving the engine process
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine binary missing or not executable
    #[error("Failed to start engine at {path:?}: {source}")]
    SpawnError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stream to or from the engine closed unexpectedly
    #[error("Engine disconnected while {context}")]
    EngineDisconnected { context: String },

    /// No sentinel seen before the read deadline
    #[error("Engine did not answer with '{sentinel}' within {timeout:?}")]
    EngineTimeout { sentinel: String, timeout: Duration },

    /// Sentinel present but the expected payload is missing or malformed
    #[error("Could not parse engine reply ({expected}): {excerpt:?}")]
    ProtocolParseFailure { expected: String, excerpt: String },

    /// Any other I/O failure on the pipes or the process
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn disconnected(context: impl Into<String>) -> Self {
        EngineError::EngineDisconnected {
            context: context.into(),
        }
    }

    /// Build a parse failure quoting at most the tail of the transcript
    pub(crate) fn parse_failure(expected: impl Into<String>, transcript: &str) -> Self {
        const EXCERPT_CHARS: usize = 120;
        let skip = transcript.chars().count().saturating_sub(EXCERPT_CHARS);
        EngineError::ProtocolParseFailure {
            expected: expected.into(),
            excerpt: transcript.chars().skip(skip).collect(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
