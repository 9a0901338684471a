//! USB device denylist store
//!
//! Keeps a set of vendor id / product id pairs that a host should refuse,
//! persisted as a binary snapshot and editable as flat `vendor:product` text.
//!
//! # Example
//!
//! ```
//! use denylist::DenylistStore;
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let mut store = DenylistStore::open(dir.path().join("denylist.bin")).unwrap();
//!
//! store.add("046d", "c52b");
//! store.add("046d", "c52e");
//! store.save().unwrap();
//!
//! assert!(store.is_denylisted("046d", "c52b"));
//! assert!(!store.is_denylisted("046d", "0001"));
//! assert_eq!(store.flatten(), vec!["046d:c52b", "046d:c52e"]);
//!
//! // Bulk edits replace everything and save once
//! let report = store.unflatten(["a:b", "bad", "c:d"]).unwrap();
//! assert_eq!(report.rejected.len(), 1);
//! assert_eq!(store.flatten(), vec!["a:b", "c:d"]);
//! ```

pub mod entry;
pub mod error;
pub mod flat;
pub mod model;
pub mod store;

pub use entry::{DELIMITER, DenylistEntry, EntryError};
pub use error::{DecodeError, DenylistError, Result};
pub use flat::{ParsedLines, RejectedLine, parse_lines, render_text, split_text};
pub use model::Denylist;
pub use store::{DenylistStore, ImportReport, LoadOutcome, SharedStore};
