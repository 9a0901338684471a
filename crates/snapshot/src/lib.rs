//! Snapshot format library for usb-watchguard
//!
//! This crate defines the durable on-disk encoding of a USB denylist: a small
//! fixed header (magic, format version, flags, payload length), a postcard
//! payload and a CRC32 trailer. It knows nothing about denylist semantics;
//! the `denylist` crate builds its model from a decoded [`SnapshotBody`].
//!
//! # Example
//!
//! ```
//! use snapshot::{SnapshotBody, VendorRecord, CURRENT_VERSION};
//! use snapshot::{decode_snapshot, encode_snapshot, peek_version};
//!
//! let body = SnapshotBody {
//!     vendors: vec![VendorRecord {
//!         vendor_id: "0781".to_string(),
//!         product_ids: vec!["5567".to_string()],
//!     }],
//! };
//!
//! let bytes = encode_snapshot(&body).unwrap();
//! assert_eq!(peek_version(&bytes).unwrap(), CURRENT_VERSION);
//!
//! let decoded = decode_snapshot(&bytes).unwrap();
//! assert_eq!(decoded.pair_count(), 1);
//! ```

pub mod codec;
pub mod error;
pub mod integrity;
pub mod types;
pub mod version;

pub use codec::{
    HEADER_LEN, MAGIC, MAX_PAYLOAD_SIZE, TRAILER_LEN, decode_snapshot, encode_snapshot,
    peek_version, validate_version, write_snapshot,
};
pub use error::{Result, SnapshotError};
pub use types::{SnapshotBody, VendorRecord};
pub use version::{CURRENT_VERSION, FormatVersion};
