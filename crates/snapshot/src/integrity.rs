//! Data integrity utilities for snapshot files
//!
//! A CRC32 trailer guards the snapshot payload so a torn write or a flipped
//! bit is reported as corruption instead of being decoded into a plausible
//! but wrong denylist.

use crc32fast::Hasher;

/// Compute CRC32 checksum for data
#[inline]
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verify CRC32 checksum for data
#[inline]
pub fn verify_checksum(data: &[u8], expected_checksum: u32) -> bool {
    compute_checksum(data) == expected_checksum
}

/// Integrity verification result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityResult {
    /// Payload passed integrity check
    Valid,
    /// Checksum mismatch - payload is corrupted
    ChecksumMismatch { expected: u32, computed: u32 },
}

impl IntegrityResult {
    /// Check a payload against the checksum stored in its trailer
    pub fn check(data: &[u8], expected: u32) -> Self {
        let computed = compute_checksum(data);
        if computed == expected {
            IntegrityResult::Valid
        } else {
            IntegrityResult::ChecksumMismatch { expected, computed }
        }
    }

    /// Returns true if data is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, IntegrityResult::Valid)
    }
}
