//! Shared error type for the PitchPlot crates

use thiserror::Error;

/// Result alias for shared-layer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the shared layers. Pipeline stages carry their own
/// error types (`ExtractError` and friends); this covers configuration and
/// the I/O underneath it.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
