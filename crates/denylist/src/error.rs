//! Denylist error types
//!
//! Only [`DenylistError::StorageUnavailable`] and [`DenylistError::StorageWrite`]
//! ever reach a caller through a `Result`. Decode failures and malformed
//! import lines are recovered inside the store and surfaced as values
//! ([`crate::LoadOutcome`], [`crate::ImportReport`]) plus a `tracing` warning.

use crate::entry::EntryError;
use snapshot::SnapshotError;
use std::path::PathBuf;
use thiserror::Error;

/// Denylist store errors
#[derive(Debug, Error)]
pub enum DenylistError {
    /// The snapshot directory or file could not be created
    #[error("Denylist storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the snapshot failed
    #[error("Failed to write denylist snapshot {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },

    /// A non-empty snapshot could not be decoded
    #[error("Denylist snapshot {} is unreadable: {source}", path.display())]
    StorageDecode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// One line of flat text was not a valid `vendor:product` entry
    #[error("Couldn't understand `{line}`: {reason}")]
    MalformedEntry {
        line: String,
        #[source]
        reason: EntryError,
    },
}

/// Why a snapshot file could not be turned into a denylist
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Read(#[from] std::io::Error),

    #[error("{0}")]
    Format(#[from] SnapshotError),

    #[error("invalid entry `{entry}`: {reason}")]
    InvalidEntry { entry: String, reason: EntryError },
}

/// Type alias for denylist results
pub type Result<T> = std::result::Result<T, DenylistError>;
