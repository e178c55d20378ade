//! Terminal chess against a UCI engine
//!
//! The engine process is the only rules authority. This crate spawns it,
//! talks UCI over its pipes and keeps a local board in step with the moves
//! both sides play.

pub mod core;
pub mod engine;
pub mod game;
pub mod ui;
