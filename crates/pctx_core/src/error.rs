//! Error types for pctx_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for context store operations.
#[derive(Error, Debug)]
pub enum PctxError {
    /// A persisted file exists but could not be parsed.
    #[error("corrupt data in {}: {}", path.display(), reason)]
    CorruptData {
        /// Path to the unreadable file
        path: PathBuf,
        /// Description of the parse failure
        reason: String,
    },

    /// A required command parameter was not supplied.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A shallow merge left a domain record with mistyped fields.
    #[error("invalid update for domain '{domain}': {reason}")]
    InvalidUpdate {
        /// Domain being updated
        domain: String,
        /// Why the merged record was rejected
        reason: String,
    },

    /// Serialization error while encoding a document or log line.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The store lock is held by another process.
    #[error("context store locked by another process ({})", path.display())]
    StoreLocked {
        /// Path to the lock file
        path: PathBuf,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PctxError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CorruptData { .. } => Some(
                "Fix or remove the damaged file by hand. Archived snapshots live under archive/.",
            ),
            Self::StoreLocked { .. } => Some(
                "Wait for the other pctx process to finish, or remove .pctx.lock if no process is running.",
            ),
            Self::ConfigError(_) => Some("Check pctx.toml in the project root."),
            Self::InvalidUpdate { .. } => {
                Some("Known domain fields must keep their types (lists of strings, integer priority).")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for pctx_core operations.
pub type Result<T> = std::result::Result<T, PctxError>;
