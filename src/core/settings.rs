//! Engine and game settings
//!
//! [`EngineSettings`] holds everything the host needs to start and drive the
//! external engine. It is serialized to JSON by
//! [`crate::core::settings_persistence`] and can be overridden field by field
//! from the command line.

use crate::core::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default engine binary location, relative to the working directory
pub const DEFAULT_ENGINE_PATH: &str = "./output/bin/stockfish";

/// Default `go depth` for the engine's reply
pub const DEFAULT_SEARCH_DEPTH: u32 = 10;

/// Settings for the engine session and the turn loop
///
/// # Fields
///
/// - `engine_path`: binary to execute
/// - `engine_args`: extra arguments passed to the binary
/// - `search_depth`: depth used for the engine's `go depth` search
/// - `read_timeout_ms`: deadline for every response read
/// - `shutdown_grace_ms`: how long `quit` may take before the child is killed
/// - `options`: `setoption` pairs sent during the handshake, in key order
/// - `flip_board`: render with Black at the bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub engine_path: PathBuf,
    pub engine_args: Vec<String>,
    pub search_depth: u32,
    pub read_timeout_ms: u64,
    pub shutdown_grace_ms: u64,
    pub options: BTreeMap<String, String>,
    pub flip_board: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from(DEFAULT_ENGINE_PATH),
            engine_args: Vec::new(),
            search_depth: DEFAULT_SEARCH_DEPTH,
            read_timeout_ms: 30_000,
            shutdown_grace_ms: 500,
            options: BTreeMap::new(),
            flip_board: false,
        }
    }
}

impl EngineSettings {
    /// Deadline applied to each `read_until`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Grace period between `quit` and a forced kill
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Parse a `NAME=VALUE` pair and store it as an engine option
    ///
    /// Names may contain spaces (`Skill Level=5`); the split happens on the
    /// first `=`.
    pub fn set_option_from_str(&mut self, raw: &str) -> CoreResult<()> {
        let (name, value) = raw
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .filter(|(n, _)| !n.is_empty())
            .ok_or_else(|| CoreError::InvalidOption {
                raw: raw.to_string(),
            })?;
        self.options.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
