//! Error types for playhead
//!
//! Defines crate-wide error types using thiserror for clear error propagation.

use thiserror::Error;

/// Common result type for playhead operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the playhead crate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Seek request rejected or failed by the player backend
    #[error("Seek error: {0}")]
    Seek(String),

    /// Player transport errors (play/pause/mode changes)
    #[error("Player error: {0}")]
    Player(String),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
