//! Snapshot payload types
//!
//! The payload is deliberately flat: a list of vendor records, each carrying
//! its product ids. Readers rebuild their own in-memory model from these
//! records field by field, so the on-disk shape never has to mirror any
//! particular collection type.

use serde::{Deserialize, Serialize};

/// Full contents of a denylist snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub vendors: Vec<VendorRecord>,
}

/// Product ids denylisted for one vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor_id: String,
    pub product_ids: Vec<String>,
}

impl SnapshotBody {
    /// Total number of vendor/product pairs in the snapshot
    pub fn pair_count(&self) -> usize {
        self.vendors.iter().map(|v| v.product_ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pair_count() == 0
    }
}
