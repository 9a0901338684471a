//! Snapshot encoding and decoding
//!
//! The payload is serialized using postcard (compact binary format) and
//! wrapped in a fixed header and a checksum trailer.
//!
//! # File Format
//!
//! ```text
//! [Magic "UWDL": 4][Major: u8][Minor: u8][Patch: u8][Flags: u8]
//! [Payload length: u32 (big-endian)][Payload (postcard)][CRC32: u32 (big-endian)]
//! ```
//!
//! Maximum payload size is 16 MiB to keep a corrupted length field from
//! triggering a huge allocation.

use crate::error::{Result, SnapshotError};
use crate::integrity::{IntegrityResult, compute_checksum};
use crate::{CURRENT_VERSION, FormatVersion, SnapshotBody};
use std::io::Write;

/// Magic bytes at the start of every snapshot file
pub const MAGIC: [u8; 4] = *b"UWDL";

/// Header length: magic + version + flags + payload length
pub const HEADER_LEN: usize = 12;

/// Trailer length: CRC32 of the payload
pub const TRAILER_LEN: usize = 4;

/// Maximum allowed payload size (16 MiB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Encode a snapshot body into a complete snapshot file image
///
/// # Example
/// ```
/// use snapshot::{SnapshotBody, VendorRecord, encode_snapshot, decode_snapshot};
///
/// let body = SnapshotBody {
///     vendors: vec![VendorRecord {
///         vendor_id: "046d".to_string(),
///         product_ids: vec!["c52b".to_string()],
///     }],
/// };
/// let bytes = encode_snapshot(&body).unwrap();
/// assert_eq!(&bytes[..4], b"UWDL");
/// assert_eq!(decode_snapshot(&bytes).unwrap(), body);
/// ```
pub fn encode_snapshot(body: &SnapshotBody) -> Result<Vec<u8>> {
    let payload = postcard::to_allocvec(body)?;
    let payload_len = payload.len();

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(SnapshotError::PayloadTooLarge {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut out = Vec::with_capacity(HEADER_LEN + payload_len + TRAILER_LEN);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&CURRENT_VERSION.to_bytes());
    out.push(0); // flags
    out.extend_from_slice(&(payload_len as u32).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&compute_checksum(&payload).to_be_bytes());

    Ok(out)
}

/// Decode a complete snapshot file image
///
/// Checks run cheapest-first: magic, version, flags, length, checksum, and
/// only then the postcard payload.
pub fn decode_snapshot(bytes: &[u8]) -> Result<SnapshotBody> {
    let (version, payload_len) = decode_header(bytes)?;
    validate_version(&version)?;

    let expected = HEADER_LEN + payload_len + TRAILER_LEN;
    if bytes.len() < expected {
        return Err(SnapshotError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(SnapshotError::TrailingBytes(bytes.len() - expected));
    }

    let payload = &bytes[HEADER_LEN..HEADER_LEN + payload_len];
    let t = HEADER_LEN + payload_len;
    let stored = u32::from_be_bytes([bytes[t], bytes[t + 1], bytes[t + 2], bytes[t + 3]]);

    if let IntegrityResult::ChecksumMismatch { expected, computed } =
        IntegrityResult::check(payload, stored)
    {
        return Err(SnapshotError::ChecksumMismatch { expected, computed });
    }

    postcard::from_bytes(payload).map_err(SnapshotError::from)
}

/// Read the format version from a snapshot header without decoding the payload
pub fn peek_version(bytes: &[u8]) -> Result<FormatVersion> {
    decode_header(bytes).map(|(version, _)| version)
}

/// Validate snapshot version compatibility
///
/// Returns an error if the file's major version differs from the current one.
pub fn validate_version(version: &FormatVersion) -> Result<()> {
    if !CURRENT_VERSION.can_read(version) {
        return Err(SnapshotError::IncompatibleVersion {
            major: version.major,
            minor: version.minor,
            expected_major: CURRENT_VERSION.major,
        });
    }
    Ok(())
}

/// Encode a snapshot body and write it to a writer (e.g., a file)
pub fn write_snapshot<W: Write>(writer: &mut W, body: &SnapshotBody) -> Result<()> {
    let bytes = encode_snapshot(body)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn decode_header(bytes: &[u8]) -> Result<(FormatVersion, usize)> {
    let magic_len = bytes.len().min(MAGIC.len());
    if bytes[..magic_len] != MAGIC[..magic_len] {
        return Err(SnapshotError::BadMagic);
    }

    if bytes.len() < HEADER_LEN {
        return Err(SnapshotError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let version = FormatVersion::from_bytes([bytes[4], bytes[5], bytes[6]]);

    let flags = bytes[7];
    if flags != 0 {
        return Err(SnapshotError::UnsupportedFlags(flags));
    }

    let payload_len = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(SnapshotError::PayloadTooLarge {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    Ok((version, payload_len))
}
