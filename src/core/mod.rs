//! Core module - Engine settings and their persistence
//!
//! - [`EngineSettings`] - Engine path, search depth, timeouts and UCI options
//! - [`settings_persistence`] - JSON file in the platform config directory

pub mod error;
pub mod settings;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use settings::EngineSettings;
pub use settings_persistence::{default_settings_path, load_settings, save_settings};
