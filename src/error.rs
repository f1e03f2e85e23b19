//! Error types for aircheck
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide operators toward fixing common issues.

use thiserror::Error;

/// Top-level error type for the aircheck application
#[derive(Error, Debug)]
pub enum AircheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No capture program found (searched for: {}).\n  Install ffmpeg and make sure it is on PATH.", .candidates.join(", "))]
    ProgramNotFound { candidates: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AircheckError
pub type Result<T> = std::result::Result<T, AircheckError>;
