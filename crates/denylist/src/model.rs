//! In-memory denylist model

use crate::entry::{DELIMITER, DenylistEntry};
use crate::error::DecodeError;
use snapshot::{SnapshotBody, VendorRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping of vendor id to the set of its denylisted product ids
///
/// Vendors and products are kept sorted, so iteration, [`Denylist::flatten`]
/// and snapshots are deterministic. A vendor is only present while it has at
/// least one product; a missing vendor and a vendor with no products are
/// the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Denylist {
    vendors: BTreeMap<String, BTreeSet<String>>,
}

impl Denylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the pair is denylisted
    pub fn contains(&self, vendor_id: &str, product_id: &str) -> bool {
        self.vendors
            .get(vendor_id)
            .is_some_and(|products| products.contains(product_id))
    }

    /// Insert a pair, returning `true` if it was not already present
    pub fn insert(&mut self, vendor_id: &str, product_id: &str) -> bool {
        match self.vendors.get_mut(vendor_id) {
            Some(products) => products.insert(product_id.to_string()),
            None => {
                self.vendors.insert(
                    vendor_id.to_string(),
                    BTreeSet::from([product_id.to_string()]),
                );
                true
            }
        }
    }

    /// Remove a pair, returning `true` if it was present
    pub fn remove(&mut self, vendor_id: &str, product_id: &str) -> bool {
        let Some(products) = self.vendors.get_mut(vendor_id) else {
            return false;
        };

        let removed = products.remove(product_id);
        if products.is_empty() {
            self.vendors.remove(vendor_id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.vendors.clear();
    }

    /// Number of vendor/product pairs
    pub fn len(&self) -> usize {
        self.vendors.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }

    /// Product ids denylisted for one vendor, in sorted order
    pub fn products(&self, vendor_id: &str) -> impl Iterator<Item = &str> {
        self.vendors
            .get(vendor_id)
            .into_iter()
            .flat_map(|products| products.iter().map(String::as_str))
    }

    /// All pairs as `(vendor_id, product_id)`, sorted by vendor then product
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vendors.iter().flat_map(|(vendor, products)| {
            products
                .iter()
                .map(move |product| (vendor.as_str(), product.as_str()))
        })
    }

    /// Render every pair as `vendor:product`, one string per pair
    pub fn flatten(&self) -> Vec<String> {
        self.pairs()
            .map(|(vendor, product)| format!("{vendor}{DELIMITER}{product}"))
            .collect()
    }

    /// Build the snapshot payload for this denylist
    pub fn to_snapshot(&self) -> SnapshotBody {
        SnapshotBody {
            vendors: self
                .vendors
                .iter()
                .map(|(vendor, products)| VendorRecord {
                    vendor_id: vendor.clone(),
                    product_ids: products.iter().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a denylist from a decoded snapshot payload
    ///
    /// Every pair goes through the same validation as imported text, so a
    /// snapshot that decodes structurally but carries tokens no writer could
    /// have produced is reported as corrupt. Vendors without products are
    /// dropped.
    pub fn from_snapshot(body: SnapshotBody) -> Result<Self, DecodeError> {
        let mut denylist = Self::new();

        for record in body.vendors {
            for product_id in record.product_ids {
                let entry = DenylistEntry::new(record.vendor_id.as_str(), product_id.as_str())
                    .map_err(|reason| DecodeError::InvalidEntry {
                        entry: format!("{}{}{}", record.vendor_id, DELIMITER, product_id),
                        reason,
                    })?;
                denylist.insert(entry.vendor_id(), entry.product_id());
            }
        }

        Ok(denylist)
    }
}

impl Extend<DenylistEntry> for Denylist {
    fn extend<T: IntoIterator<Item = DenylistEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert(entry.vendor_id(), entry.product_id());
        }
    }
}

impl FromIterator<DenylistEntry> for Denylist {
    fn from_iter<T: IntoIterator<Item = DenylistEntry>>(iter: T) -> Self {
        let mut denylist = Self::new();
        denylist.extend(iter);
        denylist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut denylist = Denylist::new();
        assert!(denylist.insert("046d", "c52b"));
        assert!(!denylist.insert("046d", "c52b"));
        assert!(denylist.contains("046d", "c52b"));
        assert!(!denylist.contains("046d", "0001"));
        assert!(!denylist.contains("0781", "c52b"));
        assert_eq!(denylist.len(), 1);
    }

    #[test]
    fn test_remove_drops_empty_vendor() {
        let mut denylist = Denylist::new();
        denylist.insert("046d", "c52b");
        denylist.insert("046d", "c52e");

        assert!(denylist.remove("046d", "c52b"));
        assert_eq!(denylist.vendor_count(), 1);

        assert!(denylist.remove("046d", "c52e"));
        assert_eq!(denylist.vendor_count(), 0);
        assert_eq!(denylist, Denylist::new());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut denylist = Denylist::new();
        denylist.insert("046d", "c52b");
        let before = denylist.clone();

        assert!(!denylist.remove("046d", "ffff"));
        assert!(!denylist.remove("ffff", "c52b"));
        assert_eq!(denylist, before);
    }

    #[test]
    fn test_flatten_is_sorted() {
        let mut denylist = Denylist::new();
        denylist.insert("b", "2");
        denylist.insert("a", "9");
        denylist.insert("b", "1");

        assert_eq!(denylist.flatten(), vec!["a:9", "b:1", "b:2"]);
        assert_eq!(denylist.products("b").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(denylist.products("zzz").count(), 0);
    }

    #[test]
    fn test_snapshot_conversion() {
        let mut denylist = Denylist::new();
        denylist.insert("046d", "c52b");
        denylist.insert("0781", "5567");

        let body = denylist.to_snapshot();
        assert_eq!(body.vendors.len(), 2);
        assert_eq!(body.pair_count(), 2);

        let rebuilt = Denylist::from_snapshot(body).unwrap();
        assert_eq!(rebuilt, denylist);
    }

    #[test]
    fn test_from_snapshot_rejects_invalid_tokens() {
        let body = SnapshotBody {
            vendors: vec![VendorRecord {
                vendor_id: "046d".to_string(),
                product_ids: vec!["".to_string()],
            }],
        };
        assert!(matches!(
            Denylist::from_snapshot(body),
            Err(DecodeError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_from_snapshot_merges_duplicate_vendors() {
        let body = SnapshotBody {
            vendors: vec![
                VendorRecord {
                    vendor_id: "046d".to_string(),
                    product_ids: vec!["c52b".to_string()],
                },
                VendorRecord {
                    vendor_id: "046d".to_string(),
                    product_ids: vec!["c52e".to_string(), "c52b".to_string()],
                },
                VendorRecord {
                    vendor_id: "dead".to_string(),
                    product_ids: vec![],
                },
            ],
        };

        let denylist = Denylist::from_snapshot(body).unwrap();
        assert_eq!(denylist.flatten(), vec!["046d:c52b", "046d:c52e"]);
        assert_eq!(denylist.vendor_count(), 1);
    }

    #[test]
    fn test_from_iterator() {
        let denylist: Denylist = ["046d:c52b", "046d:c52e", "046d:c52b"]
            .iter()
            .map(|line| line.parse::<DenylistEntry>().unwrap())
            .collect();
        assert_eq!(denylist.len(), 2);
    }
}
