//! Error type for the I/O edges of the crate
//!
//! The simulation itself never fails; only loading and saving do.

/// Errors from configuration, snapshots and high-score storage
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot written by an incompatible build
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Tuning values that would break the simulation
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

pub type Result<T> = std::result::Result<T, Error>;
