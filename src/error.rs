//! Error types
//!
//! Only configuration problems are errors. Missing components and empty
//! queries inside a frame are absorbed by the systems themselves.

use crate::scene::GameState;

/// Fatal faults that stop the frame loop
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A state was requested that no scene handles
    #[error("no scene registered for state {0:?}")]
    SceneNotRegistered(GameState),
}

/// Settings load/save and rebinding errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown player {0} (expected 1 or 2)")]
    UnknownPlayer(u8),
}
