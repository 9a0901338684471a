//! Snapshot error types

use thiserror::Error;

/// Snapshot format errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Payload serialization error from postcard
    #[error("Serialization error: {0}")]
    Serialization(#[from] postcard::Error),

    /// File does not start with the snapshot magic bytes
    #[error("Not a denylist snapshot (bad magic bytes)")]
    BadMagic,

    /// Snapshot written by an incompatible format version
    #[error(
        "Incompatible snapshot version: {major}.{minor} (expected {expected_major}.x)"
    )]
    IncompatibleVersion {
        major: u8,
        minor: u8,
        expected_major: u8,
    },

    /// Header flags this reader does not understand
    #[error("Unsupported snapshot flags: {0:#04x}")]
    UnsupportedFlags(u8),

    /// Payload length exceeds maximum allowed size
    #[error("Payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Snapshot ends before the declared payload and checksum
    #[error("Truncated snapshot: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Extra bytes after the checksum trailer
    #[error("Unexpected {0} trailing bytes after snapshot")]
    TrailingBytes(usize),

    /// Payload checksum does not match the trailer
    #[error("Checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },

    /// I/O error while reading or writing a snapshot stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for snapshot results
pub type Result<T> = std::result::Result<T, SnapshotError>;
