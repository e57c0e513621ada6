//! Error handling for PlantSense-RS
//!
//! This module defines the crate error type and a `Result` alias used
//! throughout the library.
//!
//! Expected control-flow conditions (`NotConnected`, `NothingToSave`) are
//! ordinary error values so callers can branch on them; they never panic.
//! Decoder-level noise (unparsable tokens, empty chunks) is absorbed inside
//! the pipeline and does not appear here at all.

use thiserror::Error;

/// Main error type for PlantSense-RS operations
#[derive(Error, Debug)]
pub enum PlantSenseError {
    /// A recording was started without an active peripheral connection
    #[error("not connected to a peripheral")]
    NotConnected,

    /// A recording was stopped before any sample arrived
    #[error("no samples captured, nothing to save")]
    NothingToSave,

    /// A store operation referenced a session id that does not exist
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Two session records collided on the same id.
    ///
    /// The id generator guarantees process-local uniqueness, so this
    /// indicates a broken invariant; the store refuses to overwrite.
    #[error("session id collision: {0} already exists")]
    IdCollision(String),

    /// Errors related to the transport layer
    #[error("transport error: {0}")]
    Transport(String),

    /// Errors related to configuration loading/saving
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors (store files, export files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors for store documents
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for PlantSense-RS operations
pub type Result<T> = std::result::Result<T, PlantSenseError>;
