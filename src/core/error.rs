//! Error types for core module
//!
//! Provides custom error types for core functionality: settings persistence
//! and command-line overrides.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// A `name=value` engine option given on the command line was malformed
    #[error("Invalid engine option '{raw}': expected NAME=VALUE")]
    InvalidOption { raw: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
